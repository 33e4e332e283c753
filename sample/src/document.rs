use record_synth_macros::NestedData;

#[derive(Clone, Debug, Default, PartialEq, NestedData)]
pub struct Document {
    pub layout: Layout,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    pub margins: Option<Margins>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Margins {
    pub top: Size,
    pub bottom: Size,
    pub left: Size,
    pub right: Size,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub value: i32,
}

impl Margins {
    pub fn uniform(value: i32) -> Self {
        let size = Size { value };
        Self { top: size, bottom: size, left: size, right: size }
    }
}

/// Self-referential: `next` is overridden as a whole.
#[derive(Clone, Debug, PartialEq, NestedData)]
pub struct Chain {
    pub label: String,
    pub next: Option<Box<Chain>>,
}

include!(concat!(env!("OUT_DIR"), "/document/generated.rs"));
