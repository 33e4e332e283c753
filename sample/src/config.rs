use record_synth_macros::{Mergeable, NestedData};

#[derive(Clone, Debug, PartialEq, NestedData)]
pub struct Config {
    pub id: i32,
    pub app: AppConfig,
    pub fallback_app: AppConfig,
    pub notifications: NotificationConfig,
    pub io: IoConfig,
    pub a: a::A,
}

#[derive(Clone, Debug, PartialEq, Mergeable)]
pub struct AppConfig {
    pub theme: String,
    pub accent: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NotificationConfig {
    pub email: bool,
    pub push: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IoConfig {
    pub source: SourceIoConfig,
    pub output: Option<OutputIoConfig>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SourceIoConfig {
    pub source_dir: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutputIoConfig {
    pub output_dir: String,
}

pub mod a {
    #[derive(Clone, Debug, PartialEq)]
    pub struct A {
        pub b: b::B,
    }

    pub mod b {
        #[derive(Clone, Debug, PartialEq)]
        pub struct B {
            pub c: c::C,
        }

        pub mod c {
            #[derive(Clone, Debug, PartialEq)]
            pub struct C {
                pub d: Option<d::D>,
            }

            pub mod d {
                #[derive(Clone, Debug, PartialEq)]
                pub struct D {
                    pub e: Option<E>,
                }

                #[derive(Clone, Debug, PartialEq)]
                pub struct E {
                    pub value: i32,
                }
            }
        }
    }
}

include!(concat!(env!("OUT_DIR"), "/config/generated.rs"));
