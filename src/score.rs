use crate::types::Centipawns;

/// Scores beyond this many centipawns either way fill the bar completely.
pub const SCORE_CAP: Centipawns = 800;

/// Map a score to the share of the evaluation bar given to white.
///
/// Linear between `-SCORE_CAP` (0.0) and `SCORE_CAP` (1.0), saturating
/// outside that range. An even score maps to exactly 0.5.
pub fn project(score_cp: Centipawns) -> f64 {
    let clamped = score_cp.clamp(-SCORE_CAP, SCORE_CAP) as f64;
    0.5 + clamped / (2.0 * SCORE_CAP as f64)
}

/// Score in pawns, as shown next to the bar.
pub fn pawns(score_cp: Centipawns) -> f64 {
    score_cp as f64 / 100.0
}

/// Render a horizontal text bar, white share on the left.
pub fn render_bar(score_cp: Centipawns, width: usize) -> String {
    let white = (project(score_cp) * width as f64).round() as usize;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    bar.extend(std::iter::repeat_n('#', white));
    bar.extend(std::iter::repeat_n('.', width - white));
    bar.push(']');
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors() {
        assert_eq!(project(0), 0.5);
        assert_eq!(project(800), 1.0);
        assert_eq!(project(-800), 0.0);
        assert_eq!(project(400), 0.75);
    }

    #[test]
    fn saturates_beyond_cap() {
        assert_eq!(project(5000), 1.0);
        assert_eq!(project(-5000), 0.0);
        assert_eq!(project(Centipawns::MAX), 1.0);
        assert_eq!(project(Centipawns::MIN), 0.0);
    }

    #[test]
    fn small_advantage() {
        assert!((project(35) - 0.522).abs() < 1e-3);
        assert!(project(-35) < 0.5);
    }

    #[test]
    fn pawn_units() {
        assert_eq!(pawns(35), 0.35);
        assert_eq!(pawns(-250), -2.5);
    }

    #[test]
    fn bar_rendering() {
        assert_eq!(render_bar(0, 10), "[#####.....]");
        assert_eq!(render_bar(2000, 4), "[####]");
        assert_eq!(render_bar(-2000, 4), "[....]");
    }
}
