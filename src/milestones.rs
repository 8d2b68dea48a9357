#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Celebration {
    pub threshold: f64,
    pub title: &'static str,
    pub message: &'static str,
    pub icon: &'static str,
}

pub const MILESTONES: &[Celebration] = &[
    Celebration {
        threshold: 25.0,
        title: "25% reached!",
        message: "A quarter of your goal is already saved. Keep it up!",
        icon: "\u{1f389}",
    },
    Celebration {
        threshold: 50.0,
        title: "Halfway there!",
        message: "You have saved 50% of your goal. Incredible progress!",
        icon: "\u{1f525}",
    },
    Celebration {
        threshold: 75.0,
        title: "75% complete!",
        message: "One last push and the goal is yours.",
        icon: "\u{2b50}",
    },
    Celebration {
        threshold: 100.0,
        title: "GOAL ACHIEVED!",
        message: "Congratulations, you reached your savings goal!",
        icon: "\u{1f3c6}",
    },
];

/// Milestones crossed upward when progress moves from `previous` to
/// `current` percent, in ascending order.
pub fn crossed(previous: f64, current: f64) -> Vec<Celebration> {
    MILESTONES
        .iter()
        .filter(|m| previous < m.threshold && m.threshold <= current)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds(events: &[Celebration]) -> Vec<f64> {
        events.iter().map(|e| e.threshold).collect()
    }

    #[test]
    fn test_single_crossing() {
        assert_eq!(thresholds(&crossed(24.9, 25.0)), vec![25.0]);
        assert_eq!(thresholds(&crossed(49.0, 60.0)), vec![50.0]);
        assert_eq!(thresholds(&crossed(99.99, 100.0)), vec![100.0]);
    }

    #[test]
    fn test_no_crossing() {
        assert!(crossed(0.0, 24.99).is_empty());
        assert!(crossed(25.0, 30.0).is_empty());
        assert!(crossed(100.0, 100.0).is_empty());
        assert!(crossed(100.0, 100.5).is_empty());
    }

    #[test]
    fn test_jump_over_several_milestones() {
        assert_eq!(thresholds(&crossed(10.0, 80.0)), vec![25.0, 50.0, 75.0]);
        assert_eq!(thresholds(&crossed(0.0, 100.0)), vec![25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn test_every_milestone_has_text() {
        for m in MILESTONES {
            assert!(!m.title.is_empty());
            assert!(!m.message.is_empty());
            assert!(!m.icon.is_empty());
        }
    }
}
