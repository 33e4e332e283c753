//! Records exercised by the generated `merge` and `deep_copy` functions.
use record_synth_macros::Mergeable;

pub mod alphabet;
pub mod config;
pub mod document;

#[derive(Clone, Debug, PartialEq, Mergeable)]
pub struct Person {
    pub name: Option<String>,
    pub age: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Mergeable)]
pub struct Contact {
    pub person: Option<Person>,
    pub email: Option<String>,
}

include!(concat!(env!("OUT_DIR"), "/generated.rs"));
