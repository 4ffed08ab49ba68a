//! Cross-cutting helpers shared by the IO layer.

pub mod parallel;
