//! Renaming the local variables of java classes with [Parchment](https://parchmentmc.org/) mappings.
//!
//! A mapping archive is read with [`archive::read`] and parsed with a [`reader::MappingDeserializer`] into a
//! [`tree::MappingTable`]. A [`transformer::ParchmentTransformer`] made from that table then wraps any
//! [`duke`] class visitor, so that the local variables of the methods with an entry get the mapped names.
//!
//! [`pipeline::resolve`] does all of this off the calling thread, starting from a [`resolve::DependencySpec`].

pub mod adapter;
pub mod archive;
pub mod coord;
pub mod lv_namer;
pub mod named;
pub mod pipeline;
pub mod reader;
pub mod resolve;
pub mod timestamp;
pub mod transformer;
pub mod tree;
pub mod version;
pub mod writer;
