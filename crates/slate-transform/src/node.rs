//! Visual node contract and input modifiers

use slate_core::{BoundBox, Position, ResetAttrs, Scale};

/// Keyboard modifiers held while an interaction is in progress
///
/// The host passes this into every controller call rather than the
/// controller reading it from ambient event state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierState {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl ModifierState {
    /// No modifiers held
    pub const NONE: ModifierState = ModifierState {
        shift: false,
        alt: false,
        ctrl: false,
    };

    /// Only shift held
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    /// Whether the aspect ratio should be locked
    pub fn keep_aspect_ratio(&self) -> bool {
        self.shift
    }
}

/// A partial set of node attributes to apply in one call
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeAttrs {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
}

impl NodeAttrs {
    /// Attributes that move a node to `position`
    pub fn position(position: Position) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Self::default()
        }
    }

    /// Attributes that set a node's scale
    pub fn scale(scale: Scale) -> Self {
        Self {
            scale_x: Some(scale.scale_x),
            scale_y: Some(scale.scale_y),
            ..Self::default()
        }
    }
}

impl From<ResetAttrs> for NodeAttrs {
    fn from(reset: ResetAttrs) -> Self {
        Self {
            x: Some(reset.x),
            y: Some(reset.y),
            width: Some(reset.width),
            height: Some(reset.height),
            scale_x: Some(reset.scale_x),
            scale_y: Some(reset.scale_y),
        }
    }
}

/// A positioned rectangle with a scale factor, as drawn by the host
///
/// Nothing about rendering is assumed beyond these attributes.
pub trait TransformableNode {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn scale_x(&self) -> f64;
    fn scale_y(&self) -> f64;

    /// Apply every attribute present in `attrs`
    fn set_attrs(&mut self, attrs: NodeAttrs);

    /// Ask the host to redraw the layer holding this node
    fn batch_draw(&mut self) {}

    fn position(&self) -> Position {
        Position::new(self.x(), self.y())
    }

    fn scale(&self) -> Scale {
        Scale::new(self.scale_x(), self.scale_y())
    }

    /// The node's box in canvas coordinates, including its scale
    fn client_box(&self) -> BoundBox {
        BoundBox::new(
            self.x(),
            self.y(),
            self.width() * self.scale_x(),
            self.height() * self.scale_y(),
        )
    }
}

impl<N: TransformableNode + ?Sized> TransformableNode for &mut N {
    fn x(&self) -> f64 {
        (**self).x()
    }

    fn y(&self) -> f64 {
        (**self).y()
    }

    fn width(&self) -> f64 {
        (**self).width()
    }

    fn height(&self) -> f64 {
        (**self).height()
    }

    fn scale_x(&self) -> f64 {
        (**self).scale_x()
    }

    fn scale_y(&self) -> f64 {
        (**self).scale_y()
    }

    fn set_attrs(&mut self, attrs: NodeAttrs) {
        (**self).set_attrs(attrs)
    }

    fn batch_draw(&mut self) {
        (**self).batch_draw()
    }
}
