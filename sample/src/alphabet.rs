use std::collections::HashMap;

use record_synth_macros::NestedData;

#[derive(Clone, Debug, PartialEq, NestedData)]
pub struct Alphabet {
    pub letters: Vec<char>,
    pub any_letters: Option<Vec<char>>,
    pub letters_to_index: HashMap<char, i32>,
}

include!(concat!(env!("OUT_DIR"), "/alphabet/generated.rs"));
