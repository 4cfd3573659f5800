#![forbid(unsafe_code)]

//! Headless tidy tree layout for hierarchy diagrams.
//!
//! `mangrove` positions trees of variable-sized boxes top-down: callers
//! register nodes with [`TreeGraph::add`], the engine assigns
//! non-overlapping coordinates in Walker-style passes, and every node comes
//! back with its box position plus elbow [`Connector`]s to its children for
//! drawing. Geometry only; rendering, persistence and interaction belong to
//! the embedding application.
//!
//! ```
//! use mangrove::{NodeLabel, ROOT_ID, TreeGraph};
//!
//! let mut graph = TreeGraph::new();
//! graph.add(
//!     1,
//!     ROOT_ID,
//!     NodeLabel {
//!         width: 100.0,
//!         height: 50.0,
//!         message: "ceo".into(),
//!         ..Default::default()
//!     },
//! )?;
//! graph.add(
//!     2,
//!     1,
//!     NodeLabel {
//!         width: 60.0,
//!         height: 40.0,
//!         message: "cto".into(),
//!         ..Default::default()
//!     },
//! )?;
//! graph.render();
//!
//! let cto = graph.get(2).unwrap();
//! assert_eq!(cto.y, 50.0 + 40.0);
//! # Ok::<(), mangrove::Error>(())
//! ```

pub mod error;
pub mod graph;
pub mod layout;
pub mod model;

pub use error::{Error, Result};
pub use graph::{Node, NodeId, NodeLabel, ROOT_ID, Rgb, TreeGraph};
pub use layout::{Connector, Point, Spacing};
pub use model::{LayoutNode, TreeLayout};
