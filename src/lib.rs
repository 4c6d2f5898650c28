#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod config;
pub use config::*;

mod error;
pub use error::*;

mod factory;
pub use factory::*;

mod hydrate;
pub use hydrate::{Hydrator, hydrate};

mod object;
pub use object::*;

mod path;
pub use path::*;

mod registry;
pub use registry::*;

mod resolve;
pub use resolve::*;

mod schema;
pub use schema::*;

mod value;
pub use value::*;

pub mod coerce;
pub use coerce::CoercionMap;
