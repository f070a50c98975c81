//! Amplitude slider widget for ratatui

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Widget},
};

/// A horizontal slider mirroring a gain value in `[0, max]`
pub struct AmplitudeSlider<'a> {
    value: f64,
    max: f64,
    style: Style,
    block: Option<Block<'a>>,
}

impl<'a> AmplitudeSlider<'a> {
    pub fn new(value: f64, max: f64) -> Self {
        Self {
            value,
            max,
            style: Style::default(),
            block: None,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn render_track(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;
        let frac = if self.max > 0.0 {
            (self.value / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        };

        // Knob position along the track
        let knob = (frac * (width.saturating_sub(1)) as f64).round() as usize;
        let y = area.y;

        for x in 0..width {
            let symbol = if x == knob {
                "┃"
            } else if x < knob {
                "━"
            } else {
                "─"
            };
            buf.set_string(area.x + x as u16, y, symbol, self.style);
        }
    }
}

impl Widget for AmplitudeSlider<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        self.render_track(inner_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_zero_area() {
        let slider = AmplitudeSlider::new(0.1, 0.25);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        slider.render(area, &mut buf);
        // Should not panic
    }

    #[test]
    fn test_slider_at_zero() {
        let slider = AmplitudeSlider::new(0.0, 0.25);
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        slider.render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "┃");
        assert_eq!(buf[(9, 0)].symbol(), "─");
    }

    #[test]
    fn test_slider_at_ceiling() {
        let slider = AmplitudeSlider::new(0.25, 0.25);
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        slider.render(area, &mut buf);

        assert_eq!(buf[(9, 0)].symbol(), "┃");
        assert_eq!(buf[(0, 0)].symbol(), "━");
    }

    #[test]
    fn test_slider_midpoint() {
        let slider = AmplitudeSlider::new(0.125, 0.25);
        let area = Rect::new(0, 0, 11, 1);
        let mut buf = Buffer::empty(area);
        slider.render(area, &mut buf);

        assert_eq!(buf[(5, 0)].symbol(), "┃");
    }

    #[test]
    fn test_slider_with_block() {
        let slider = AmplitudeSlider::new(0.1, 0.25)
            .block(ratatui::widgets::Block::default().title("Amp"));
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        slider.render(area, &mut buf);
        // Should render without panic
    }

    #[test]
    fn test_slider_clamps_overrange_value() {
        let slider = AmplitudeSlider::new(5.0, 0.25);
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        slider.render(area, &mut buf);

        assert_eq!(buf[(9, 0)].symbol(), "┃");
    }
}
