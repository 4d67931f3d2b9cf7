//! Descry Core Types and Definitions
//!
//! This crate provides the value types shared by the Descry assembly engine
//! and the code that drives it:
//!
//! - **Domain types**: interned type identifiers and the read-only catalog
//!   relating them ([`domain`] module)
//! - **UML**: the built-in UML metaclass catalog ([`uml`] module)
//! - **Elements**: diagram, node and edge descriptions ([`element`] module)
//! - **Palettes**: tools and tool sections ([`palette`] module)

pub mod domain;
pub mod element;
pub mod palette;
pub mod uml;
