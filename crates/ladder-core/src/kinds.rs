//! Component kinds and their lookup table.
//!
//! Everything that varies by kind (palette tag, id prefix, designator,
//! body size, pin template) lives in one `KindSpec` row, so adding a kind
//! is a single table entry.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// The closed set of placeable components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    #[serde(rename = "power-source-24v")]
    Source24V,
    #[serde(rename = "power-source-0v")]
    Source0V,
    #[serde(rename = "normally-open")]
    NormallyOpen,
    #[serde(rename = "normally-closed")]
    NormallyClosed,
    #[serde(rename = "pushbutton-no")]
    PushbuttonNo,
    #[serde(rename = "pushbutton-nc")]
    PushbuttonNc,
    #[serde(rename = "coil")]
    Coil,
    #[serde(rename = "motor")]
    Motor,
    #[serde(rename = "lamp")]
    Lamp,
}

/// Where a kind's pins come from.
#[derive(Debug, Clone, Copy)]
pub enum PinTemplate {
    /// A fixed list of labelled pins.
    Fixed(&'static [PinSlot]),
    /// Evenly spaced, unlabelled pins along the rail width.
    Rail,
}

/// One pin of a fixed template.
#[derive(Debug, Clone, Copy)]
pub struct PinSlot {
    pub label: &'static str,
    pub offset: Point,
}

/// Static description of a component kind.
#[derive(Debug)]
pub struct KindSpec {
    pub kind: ComponentKind,
    /// Palette / wire-format tag, e.g. `normally-open`.
    pub tag: &'static str,
    /// Prefix for generated component ids.
    pub id_prefix: &'static str,
    /// Prefix for default labels (`S` → `S1`, `S2`, …). Rails use it verbatim.
    pub designator: &'static str,
    /// Body extent from the component origin. Rails ignore the width.
    pub body: Size,
    pub pins: PinTemplate,
}

const fn slot(label: &'static str, x: f64, y: f64) -> PinSlot {
    PinSlot {
        label,
        offset: Point::new(x, y),
    }
}

const CONTACT_NO: &[PinSlot] = &[slot("13", 10.0, 0.0), slot("14", 10.0, 40.0)];
const CONTACT_NC: &[PinSlot] = &[slot("11", 10.0, 0.0), slot("12", 10.0, 40.0)];
const COIL: &[PinSlot] = &[slot("A1", 20.0, 0.0), slot("A2", 20.0, 30.0)];
const MOTOR: &[PinSlot] = &[slot("1", 20.0, 0.0), slot("2", 20.0, 40.0)];
const LAMP: &[PinSlot] = &[slot("X1", 20.0, 0.0), slot("X2", 20.0, 40.0)];

/// Half the thickness of a rail's clickable band.
pub const RAIL_BAND: f64 = 4.0;

/// Indexed by `ComponentKind as usize`.
static KIND_TABLE: [KindSpec; 9] = [
    KindSpec {
        kind: ComponentKind::Source24V,
        tag: "power-source-24v",
        id_prefix: "rail24",
        designator: "+24V",
        body: Size::new(0.0, RAIL_BAND * 2.0),
        pins: PinTemplate::Rail,
    },
    KindSpec {
        kind: ComponentKind::Source0V,
        tag: "power-source-0v",
        id_prefix: "rail0",
        designator: "0V",
        body: Size::new(0.0, RAIL_BAND * 2.0),
        pins: PinTemplate::Rail,
    },
    KindSpec {
        kind: ComponentKind::NormallyOpen,
        tag: "normally-open",
        id_prefix: "no",
        designator: "S",
        body: Size::new(20.0, 40.0),
        pins: PinTemplate::Fixed(CONTACT_NO),
    },
    KindSpec {
        kind: ComponentKind::NormallyClosed,
        tag: "normally-closed",
        id_prefix: "nc",
        designator: "S",
        body: Size::new(20.0, 40.0),
        pins: PinTemplate::Fixed(CONTACT_NC),
    },
    KindSpec {
        kind: ComponentKind::PushbuttonNo,
        tag: "pushbutton-no",
        id_prefix: "pbno",
        designator: "S",
        body: Size::new(20.0, 40.0),
        pins: PinTemplate::Fixed(CONTACT_NO),
    },
    KindSpec {
        kind: ComponentKind::PushbuttonNc,
        tag: "pushbutton-nc",
        id_prefix: "pbnc",
        designator: "S",
        body: Size::new(20.0, 40.0),
        pins: PinTemplate::Fixed(CONTACT_NC),
    },
    KindSpec {
        kind: ComponentKind::Coil,
        tag: "coil",
        id_prefix: "coil",
        designator: "K",
        body: Size::new(40.0, 30.0),
        pins: PinTemplate::Fixed(COIL),
    },
    KindSpec {
        kind: ComponentKind::Motor,
        tag: "motor",
        id_prefix: "motor",
        designator: "M",
        body: Size::new(40.0, 40.0),
        pins: PinTemplate::Fixed(MOTOR),
    },
    KindSpec {
        kind: ComponentKind::Lamp,
        tag: "lamp",
        id_prefix: "lamp",
        designator: "H",
        body: Size::new(40.0, 40.0),
        pins: PinTemplate::Fixed(LAMP),
    },
];

impl ComponentKind {
    pub const ALL: [ComponentKind; 9] = [
        ComponentKind::Source24V,
        ComponentKind::Source0V,
        ComponentKind::NormallyOpen,
        ComponentKind::NormallyClosed,
        ComponentKind::PushbuttonNo,
        ComponentKind::PushbuttonNc,
        ComponentKind::Coil,
        ComponentKind::Motor,
        ComponentKind::Lamp,
    ];

    /// Table row for this kind.
    pub fn spec(self) -> &'static KindSpec {
        &KIND_TABLE[self as usize]
    }

    pub fn tag(self) -> &'static str {
        self.spec().tag
    }

    /// Parse a palette tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        KIND_TABLE.iter().find(|s| s.tag == tag).map(|s| s.kind)
    }

    /// Power rails: resizable, evenly spaced pins.
    pub fn is_rail(self) -> bool {
        matches!(self.spec().pins, PinTemplate::Rail)
    }

    /// Switches and pushbuttons: carry an open/closed contact state.
    pub fn is_contact(self) -> bool {
        matches!(
            self,
            ComponentKind::NormallyOpen
                | ComponentKind::NormallyClosed
                | ComponentKind::PushbuttonNo
                | ComponentKind::PushbuttonNc
        )
    }

    /// Whether the contact is open in its resting state.
    /// `None` for kinds without a contact.
    pub fn rests_open(self) -> Option<bool> {
        match self {
            ComponentKind::NormallyOpen | ComponentKind::PushbuttonNo => Some(true),
            ComponentKind::NormallyClosed | ComponentKind::PushbuttonNc => Some(false),
            _ => None,
        }
    }
}
