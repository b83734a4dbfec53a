//! Built-in wellness content: starter challenges and daily tips.

pub struct ChallengeTemplate {
    pub name: &'static str,
    pub duration_days: u32,
    pub description: &'static str,
    pub daily_tasks: &'static [&'static str],
}

pub const CHALLENGES: &[ChallengeTemplate] = &[
    ChallengeTemplate {
        name: "7-Day Posture Challenge",
        duration_days: 7,
        description: "Improve your posture with daily exercises and mindful sitting",
        daily_tasks: &[
            "Set hourly posture reminders",
            "Do 3 sets of shoulder blade squeezes",
            "Practice chin tucks 10 times",
            "Stand for at least 2 hours total",
        ],
    },
    ChallengeTemplate {
        name: "Stress-Free Week",
        duration_days: 7,
        description: "Reduce stress through mindful practices",
        daily_tasks: &[
            "10 minutes of deep breathing",
            "Take two 15-minute breaks",
            "Practice mindfulness during lunch",
            "End workday with relaxation exercise",
        ],
    },
    ChallengeTemplate {
        name: "Movement Boost",
        duration_days: 5,
        description: "Increase daily movement and flexibility",
        daily_tasks: &[
            "30 minutes total walking",
            "Complete all stretching exercises",
            "Take stairs instead of elevator",
            "Do 5 minutes of desk exercises",
        ],
    },
];

pub fn challenge_by_name(name: &str) -> Option<&'static ChallengeTemplate> {
    CHALLENGES
        .iter()
        .find(|template| template.name.eq_ignore_ascii_case(name))
}

pub struct TipCategory {
    pub category: &'static str,
    pub tips: &'static [&'static str],
}

pub const DAILY_TIPS: &[TipCategory] = &[
    TipCategory {
        category: "Stress Management",
        tips: &[
            "Take deep breaths when feeling overwhelmed",
            "Practice the 20-20-20 rule: Every 20 minutes, look at something 20 feet away for 20 seconds",
            "Use the Pomodoro Technique: 25 minutes of work followed by 5 minutes break",
            "Create a dedicated workspace separate from your relaxation area",
            "Set clear boundaries between work and personal time",
        ],
    },
    TipCategory {
        category: "Physical Health",
        tips: &[
            "Stand up and stretch every hour",
            "Maintain proper posture while sitting",
            "Keep your screen at eye level",
            "Stay hydrated throughout the day",
            "Do simple desk exercises during breaks",
        ],
    },
    TipCategory {
        category: "Activity",
        tips: &[
            "Take walking meetings when possible",
            "Do chair yoga during breaks",
            "Set a reminder to move every hour",
            "Try standing while taking phone calls",
            "Schedule short exercise sessions between meetings",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_lookup_case_insensitive() {
        assert!(challenge_by_name("movement boost").is_some());
        assert!(challenge_by_name("Marathon Month").is_none());
    }

    #[test]
    fn test_catalog_shapes() {
        for template in CHALLENGES {
            assert!(template.duration_days > 0);
            assert!(!template.daily_tasks.is_empty());
        }
        for category in DAILY_TIPS {
            assert!(!category.tips.is_empty());
        }
    }
}
