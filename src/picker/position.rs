use super::config::{HorizontalAlign, PickerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

/// Box model of the trigger element: page offset of its border box, inner
/// size, padding and border widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerGeometry {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub padding: Edges,
    pub border: Edges,
}

impl TriggerGeometry {
    pub fn outer_width(&self) -> i32 {
        self.width + self.padding.left + self.padding.right + self.border.left + self.border.right
    }

    pub fn outer_height(&self) -> i32 {
        self.height + self.padding.top + self.padding.bottom + self.border.top + self.border.bottom
    }
}

/// Where the trigger sits and how wide the page is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub trigger: TriggerGeometry,
    pub body_width: i32,
}

/// Horizontal anchoring of the popup, expressed the way CSS would: distance
/// from the left edge, or from the right edge of the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left(i32),
    Right(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub top: i32,
    pub anchor: Anchor,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Left edge of the popup regardless of anchoring.
    pub fn left_edge(&self, body_width: i32) -> i32 {
        match self.anchor {
            Anchor::Left(left) => left,
            Anchor::Right(right) => body_width - right - self.width as i32,
        }
    }

    /// Vertical offset that centres the loading message.
    pub fn preloader_padding(&self) -> u32 {
        self.height / 2
    }
}

/// Places the popup directly below the trigger, lined up with its left or
/// right edge.
pub fn place(viewport: &Viewport, config: &PickerConfig) -> Placement {
    let trigger = &viewport.trigger;
    let top = trigger.top + trigger.outer_height() + config.top_spacing;
    let anchor = match config.horizontal_align {
        HorizontalAlign::Right => {
            Anchor::Right(viewport.body_width - (trigger.left + trigger.outer_width()))
        }
        HorizontalAlign::Left => Anchor::Left(trigger.left),
    };
    Placement {
        top,
        anchor,
        width: config.width,
        height: config.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            trigger: TriggerGeometry {
                left: 100,
                top: 50,
                width: 80,
                height: 20,
                padding: Edges { top: 4, right: 6, bottom: 4, left: 6 },
                border: Edges { top: 1, right: 1, bottom: 1, left: 1 },
            },
            body_width: 1000,
        }
    }

    #[test]
    fn right_aligned_popup_ends_at_the_trigger_right_edge() {
        let config = PickerConfig { top_spacing: 5, ..PickerConfig::default() };
        let placement = place(&viewport(), &config);

        // 50 + 20 + 4 + 4 + 1 + 1 + 5
        assert_eq!(placement.top, 85);
        // 1000 - (100 + 80 + 6 + 6 + 1 + 1)
        assert_eq!(placement.anchor, Anchor::Right(806));
        assert_eq!(placement.left_edge(1000), 1000 - 806 - 400);
    }

    #[test]
    fn left_aligned_popup_starts_at_the_trigger_offset() {
        let config = PickerConfig {
            horizontal_align: HorizontalAlign::Left,
            width: 200,
            height: 120,
            ..PickerConfig::default()
        };
        let placement = place(&viewport(), &config);

        assert_eq!(placement.top, 80);
        assert_eq!(placement.anchor, Anchor::Left(100));
        assert_eq!(placement.left_edge(1000), 100);
        assert_eq!(placement.preloader_padding(), 60);
    }
}
