use std::io::Write;
use std::time::Duration;

use asteroids_core::hud::{best_time_text, current_time_text};
use asteroids_core::Overlay;

/// Menu and game-over screens as plain text lines.
pub struct LogOverlay<W: Write> {
    out: W,
}

impl<W: Write> LogOverlay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lines(&mut self, lines: &[&str]) {
        let result = lines
            .iter()
            .try_for_each(|line| writeln!(self.out, "{line}"))
            .and_then(|()| self.out.flush());
        if let Err(err) = result {
            tracing::warn!("failed writing overlay: {err}");
        }
    }
}

impl<W: Write> Overlay for LogOverlay<W> {
    fn show_menu(&mut self, best: Option<Duration>) {
        let best = best_time_text(best);
        tracing::info!("menu: {best}");
        self.write_lines(&["ASTEROIDS", &best, "Survive as long as you can."]);
    }

    fn show_game_over(&mut self, elapsed: Duration, best: Option<Duration>) {
        let time = current_time_text(elapsed);
        let best = best_time_text(best);
        tracing::info!("game over: {time}, {best}");
        self.write_lines(&["GAME OVER", &time, &best]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_shows_placeholder_without_a_record() {
        let mut overlay = LogOverlay::new(Vec::new());
        overlay.show_menu(None);
        let text = String::from_utf8(overlay.into_inner()).unwrap();
        assert!(text.contains("Best Time: -"));
    }

    #[test]
    fn game_over_shows_both_times() {
        let mut overlay = LogOverlay::new(Vec::new());
        overlay.show_game_over(
            Duration::from_millis(65_007),
            Some(Duration::from_millis(90_120)),
        );
        let text = String::from_utf8(overlay.into_inner()).unwrap();
        assert_eq!(text, "GAME OVER\nTime: 1:5.7\nBest Time: 1:30.120\n");
    }
}
