// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sparse matrix substrate - storage where zero doesn't exist.
//!
//! Two storage formats with an explicit mutability contract:
//!
//! - [`CsrMatrix`]: compressed sparse row. Read-optimized, built in one shot
//!   from triplets. In-place structural mutation is refused with
//!   [`SparseError::CompressedMutation`].
//! - [`LilMatrix`]: per-row adjacency lists. Mutation-friendly; the only
//!   format offering [`LilMatrix::remove_node_in_place`].
//!
//! Node removal clears a vertex's row and column in either format; the copy
//! path and the convert-then-mutate path produce equal matrices.
//!
//! # Example
//!
//! ```
//! use sparse_store::{CsrMatrix, SparseError};
//!
//! let graph = CsrMatrix::from_triplets(3, 3, vec![(0, 1, 1.0), (1, 2, 1.0)]).unwrap();
//!
//! // Copying removal works on compressed storage...
//! let pruned = graph.remove_node(1).unwrap();
//! assert_eq!(pruned.nnz(), 0);
//!
//! // ...in-place removal requires the adjacency-list format.
//! let mut graph = graph;
//! assert_eq!(graph.remove_node_in_place(1), Err(SparseError::CompressedMutation));
//! let mut lil = graph.to_lil();
//! lil.remove_node_in_place(1).unwrap();
//! assert_eq!(lil.to_csr(), pruned);
//! ```

#![allow(clippy::cast_possible_truncation)] // u32 column indices are ample for vocabulary-sized matrices
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)] // Error conditions are self-evident from Result types
#![allow(clippy::uninlined_format_args)]

mod csr;
mod error;
mod lil;

pub use csr::CsrMatrix;
pub use error::{Result, SparseError};
pub use lil::LilMatrix;
