//! Mutable shape descriptor with a single inferable extent.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::dim::Dim;
use super::error::DimsError;
use super::fixed::TensorDims;
use super::print::{self, PrintEntry, PrintOptions};

/// Axis list with inline capacity for the common low-rank case.
type DimVec = SmallVec<[Dim; 4]>;

/// Shape descriptor whose single free extent is inferred from a target count.
///
/// Unlike [`TensorDims`] this descriptor is edited in place by user-facing
/// code: text is parsed into it, the target element count is assigned
/// separately, and the free extent (at most one) stays symbolic until a
/// reader asks for its resolved value through [`dim`](Self::dim) or
/// [`to_fixed`](Self::to_fixed).
///
/// The descriptor also tracks whether it was explicitly authored
/// ([`is_custom`](Self::is_custom)), so a persistence layer can skip shapes
/// that are mere code defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferableDims {
    dims: DimVec,
    target_count: usize,
    is_custom: bool,
    #[serde(skip)]
    last_warning: String,
}

impl InferableDims {
    /// Creates an empty descriptor: no entries, no target count, nothing
    /// authored. It becomes resolvable (as a single-entry shape) once a
    /// target count is assigned.
    pub fn new() -> Self {
        InferableDims {
            dims: DimVec::new(),
            target_count: 0,
            is_custom: false,
            last_warning: String::new(),
        }
    }

    /// Builds a descriptor from raw legacy sizes, where `-1` marks the free
    /// extent (at most one).
    ///
    /// The result still counts as a code default: [`is_custom`](Self::is_custom)
    /// stays `false` until the descriptor is edited through
    /// [`set`](Self::set) or [`parse`](Self::parse).
    pub fn from_raw_dims(dims: &[i64]) -> Result<Self, DimsError> {
        Ok(InferableDims {
            dims: decode_raw(dims)?,
            ..InferableDims::new()
        })
    }

    /// Replaces the entries, marking the shape as explicitly authored.
    ///
    /// Fails without touching the descriptor when more than one entry is the
    /// free sentinel or any size is below it.
    pub fn set(&mut self, dims: &[i64]) -> Result<(), DimsError> {
        self.dims = decode_raw(dims)?;
        self.is_custom = true;
        self.last_warning.clear();
        Ok(())
    }

    /// The intended total element count the free extent resolves against.
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Sets the target count. Entries are never rewritten: the free slot
    /// stays symbolic and readers compute its value on demand.
    pub fn set_target_count(&mut self, count: usize) {
        self.target_count = count;
    }

    /// Number of stored entries.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Borrows the stored entries; a free extent appears as [`Dim::Free`]
    /// even when it is resolvable.
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// `true` once the entries were explicitly constructed, parsed, or set
    /// by a caller rather than left as a code default.
    pub fn is_custom(&self) -> bool {
        self.is_custom
    }

    /// Diagnostic from the most recent [`set`](Self::set) or
    /// [`parse`](Self::parse) call; empty when it succeeded.
    pub fn last_warning(&self) -> &str {
        &self.last_warning
    }

    /// Returns the extent at `index`, computing the free slot on demand.
    ///
    /// An empty descriptor with a target count acts as the single-entry
    /// shape `[target_count]`.
    pub fn dim(&self, index: usize) -> Result<usize, DimsError> {
        if self.dims.is_empty() {
            if index == 0 && self.target_count > 0 {
                return Ok(self.target_count);
            }
            let rank = if self.target_count > 0 { 1 } else { 0 };
            return Err(DimsError::IndexOutOfRange { index, rank });
        }
        match self.dims.get(index) {
            Some(Dim::Known(value)) => Ok(*value),
            Some(Dim::Free) => self.resolved_free().ok_or(DimsError::Unresolved {
                target: self.target_count,
            }),
            None => Err(DimsError::IndexOutOfRange {
                index,
                rank: self.rank(),
            }),
        }
    }

    /// Whether every extent has a definite value consistent with the target
    /// count: either there is no free slot and the product matches, or the
    /// one free slot divides the target evenly.
    pub fn can_be_computed(&self) -> bool {
        if self.dims.is_empty() {
            return self.target_count > 0;
        }
        if self.dims.iter().any(|dim| dim.is_free()) {
            self.resolved_free().is_some()
        } else {
            self.known_product() == self.target_count
        }
    }

    /// Realized element count: the resolved product when the shape can be
    /// computed, otherwise the product of the known extents.
    pub fn element_count(&self) -> usize {
        if self.dims.is_empty() {
            return self.target_count;
        }
        match self.resolved_free() {
            Some(free) if self.dims.iter().any(|dim| dim.is_free()) => {
                self.known_product() * free
            }
            _ => self.known_product(),
        }
    }

    /// Parses a comma-separated dimension list, e.g. `"2, 3, *"`.
    ///
    /// Parsing is a user-facing edit and never fails the caller: malformed
    /// input (an empty or non-numeric token, a negative size, more than one
    /// `*`) leaves the current entries untouched and stores a description in
    /// [`last_warning`](Self::last_warning).
    ///
    /// When no `*` was given and the literal product disagrees with the
    /// target count, a free extent is prepended so the shape stays
    /// resolvable against the target. The printed form is accepted back:
    /// `×` separates tokens just like `,`.
    pub fn parse(&mut self, text: &str) {
        match self.parse_dims(text) {
            Ok(dims) => {
                self.dims = dims;
                self.is_custom = true;
                self.last_warning.clear();
            }
            Err(warning) => self.last_warning = warning,
        }
    }

    /// Renders the shape for diagnostics.
    ///
    /// A free extent shows its computed value when the shape can be
    /// computed and `?` otherwise. When a target count is set but the shape
    /// disagrees with it, the result carries a trailing ` (!)` marker.
    pub fn print(&self, options: PrintOptions) -> String {
        let mismatch = self.target_count != 0 && !self.can_be_computed();
        let entries: Vec<PrintEntry> = if self.dims.is_empty() {
            vec![PrintEntry::Literal(self.target_count)]
        } else {
            let resolved = self.resolved_free();
            self.dims
                .iter()
                .map(|dim| match (dim, resolved) {
                    (Dim::Known(value), _) => PrintEntry::Literal(*value),
                    (Dim::Free, Some(value)) => PrintEntry::Computed(value),
                    (Dim::Free, None) => PrintEntry::Unknown,
                })
                .collect()
        };
        print::render(&entries, self.element_count(), mismatch, options)
    }

    /// Snapshots the resolved shape for storage.
    ///
    /// Fails with [`DimsError::Unresolved`] while the shape cannot be
    /// computed.
    pub fn to_fixed(&self) -> Result<TensorDims, DimsError> {
        if !self.can_be_computed() {
            return Err(DimsError::Unresolved {
                target: self.target_count,
            });
        }
        if self.dims.is_empty() {
            return Ok(TensorDims::new(vec![self.target_count]));
        }
        let resolved = self.resolved_free();
        let mut dims = Vec::with_capacity(self.dims.len());
        for dim in &self.dims {
            match (dim, resolved) {
                (Dim::Known(value), _) => dims.push(*value),
                (Dim::Free, Some(value)) => dims.push(value),
                (Dim::Free, None) => {
                    return Err(DimsError::Unresolved {
                        target: self.target_count,
                    })
                }
            }
        }
        Ok(TensorDims::new(dims))
    }

    /// Product of the known extents, skipping the free slot.
    fn known_product(&self) -> usize {
        self.dims.iter().filter_map(|dim| dim.known()).product()
    }

    /// Resolved value of the free slot: exact division of the target count
    /// by the product of the other extents. A zero sibling product or an
    /// unset target leaves the slot unresolved.
    fn resolved_free(&self) -> Option<usize> {
        let others = self.known_product();
        if self.target_count == 0 || others == 0 || self.target_count % others != 0 {
            return None;
        }
        Some(self.target_count / others)
    }

    fn parse_dims(&self, text: &str) -> Result<DimVec, String> {
        let mut dims = DimVec::new();
        let mut saw_free = false;
        for token in text.split(|c| c == ',' || c == '×') {
            let token = token.trim();
            if token == "*" {
                if saw_free {
                    return Err("at most one dimension may be '*'".to_string());
                }
                saw_free = true;
                dims.push(Dim::Free);
            } else {
                let size: usize = token
                    .parse()
                    .map_err(|_| format!("expected a number or '*', got '{token}'"))?;
                dims.push(Dim::Known(size));
            }
        }
        if !saw_free {
            let product: usize = dims.iter().filter_map(|dim| dim.known()).product();
            if product != self.target_count {
                dims.insert(0, Dim::Free);
            }
        }
        Ok(dims)
    }
}

impl Default for InferableDims {
    fn default() -> Self {
        InferableDims::new()
    }
}

impl fmt::Display for InferableDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print(PrintOptions::default()))
    }
}

impl TryFrom<&InferableDims> for TensorDims {
    type Error = DimsError;

    fn try_from(dims: &InferableDims) -> Result<Self, DimsError> {
        dims.to_fixed()
    }
}

/// Decodes raw legacy sizes, enforcing the single-free-extent invariant.
fn decode_raw(raw: &[i64]) -> Result<DimVec, DimsError> {
    let mut dims = DimVec::with_capacity(raw.len());
    let mut saw_free = false;
    for &value in raw {
        let dim = Dim::from_raw(value)?;
        if dim.is_free() {
            if saw_free {
                return Err(DimsError::MultipleFreeDims);
            }
            saw_free = true;
        }
        dims.push(dim);
    }
    Ok(dims)
}
