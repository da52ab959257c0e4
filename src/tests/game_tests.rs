#[cfg(test)]
mod tests {
    use crate::game::*;
    use std::time::Duration;

    #[test]
    fn test_board_dimensions() {
        // Standard playing field
        assert_eq!(BOARD_WIDTH, 10);
        assert_eq!(BOARD_HEIGHT, 20);
    }

    #[test]
    fn test_scoring_table() {
        assert_eq!(line_clear_points(1), 40);
        assert_eq!(line_clear_points(2), 100);
        assert_eq!(line_clear_points(3), 300);
        assert_eq!(line_clear_points(4), 1200);

        // Clearing more rows at once always pays better
        for n in 2..=4 {
            assert!(line_clear_points(n) > line_clear_points(n - 1));
        }
    }

    #[test]
    fn test_level_progression_constants() {
        assert_eq!(LINES_PER_LEVEL, 10);
        assert_eq!(STARTING_LEVEL, 1);
    }

    #[test]
    fn test_drop_interval_formula() {
        assert_eq!(drop_interval(1), Duration::from_millis(1000));
        assert_eq!(drop_interval(2), Duration::from_millis(950));
        assert_eq!(drop_interval(10), Duration::from_millis(550));

        // The floor is reached at level 19 and holds from there on
        assert_eq!(drop_interval(19), Duration::from_millis(100));
        assert_eq!(drop_interval(30), Duration::from_millis(100));
    }

    #[test]
    fn test_drop_interval_strictly_decreases_until_the_floor() {
        for level in 1..19 {
            assert!(
                drop_interval(level + 1) < drop_interval(level),
                "interval should shrink from level {level} to {}",
                level + 1
            );
        }
        assert_eq!(drop_interval(20), drop_interval(19));
    }
}
