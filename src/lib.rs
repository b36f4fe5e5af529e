//! # memspace - A Simulated First-Fit Memory Space
//!
//! This crate models a managed memory space the way an operating-systems
//! course does: as two lists of address ranges, one for **allocated** blocks
//! and one for **free** blocks. No real memory is touched; addresses are
//! plain word offsets into `[0, capacity)`.
//!
//! ## Overview
//!
//! ```text
//!   Memory Space (capacity = 100):
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │   0        20             50       60                           100  │
//!   │   ┌────────┬──────────────┬────────┬──────────────────────────────┐  │
//!   │   │  free  │  allocated   │ alloc  │            free              │  │
//!   │   │ (0,20) │   (20,30)    │ (50,10)│           (60,40)            │  │
//!   │   └────────┴──────────────┴────────┴──────────────────────────────┘  │
//!   │                                                                      │
//!   │   free list:      (60 , 40) (0 , 20)     <- list order, not address  │
//!   │   allocated list: (20 , 30) (50 , 10)                                │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   Every address is covered by exactly one block of one list.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   memspace
//!   ├── block   - Block value type (base address + length)
//!   ├── list    - BlockList, the ordered container behind both lists
//!   ├── space   - MemorySpace: allocate / release / defragment
//!   ├── config  - SpaceConfig construction parameters
//!   ├── sync    - SharedMemorySpace, a mutex-guarded space
//!   └── error   - ListError and SpaceError
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use memspace::MemorySpace;
//!
//! let mut space = MemorySpace::new(100).unwrap();
//!
//! assert_eq!(space.allocate(20), Some(0));
//! assert_eq!(space.allocate(30), Some(20));
//!
//! space.release(0);
//! assert_eq!(space.allocate(10), Some(50));
//!
//! space.defragment();
//! assert_eq!(space.free().to_string(), "(0 , 20) (60 , 40)");
//! ```
//!
//! ## How It Works
//!
//! Allocation walks the free list front to back and takes the **first**
//! block that is long enough, carving the request off its low end:
//!
//! ```text
//!   allocate(17) on free block (250 , 20):
//!
//!   before   ┌───────────────────────────────┐
//!            │          free (250, 20)        │
//!            └───────────────────────────────┘
//!   after    ┌──────────────────────────┬────┐
//!            │    allocated (250, 17)    │free│  free block becomes (267, 3)
//!            └──────────────────────────┴────┘
//! ```
//!
//! Releasing appends the whole block to the tail of the free list. Over time
//! the free list fills with small neighbouring pieces, which
//! [`MemorySpace::defragment`] sorts by address and merges:
//!
//! ```text
//!   free list:   (60,20) (20,20) (80,20) (40,20)
//!                       │ sort by base address
//!                       ▼
//!                (20,20) (40,20) (60,20) (80,20)
//!                       │ merge where end == next base
//!                       ▼
//!                (20,80)
//! ```
//!
//! Allocation never defragments on its own unless the space was built with
//! [`SpaceConfig::defragment_on_failure`].
//!
//! ## Limitations
//!
//! - **First-fit only**: no best-fit or buddy strategies
//! - **Single-threaded core**: wrap in [`SharedMemorySpace`] to share
//! - **In-memory only**: state is not persisted

mod block;
mod config;
mod error;
mod list;
mod space;
mod sync;

pub use block::Block;
pub use config::SpaceConfig;
pub use error::{ListError, SpaceError};
pub use list::{BlockHandle, BlockList, Iter};
pub use space::MemorySpace;
pub use sync::SharedMemorySpace;
