// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced by change-detection passes.

use core::fmt;

use crate::value::BindingValue;
use crate::view::{ContainerId, ViewId};

/// Identifies one binding inside a view's check function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BindingLocation {
    /// The view whose check function evaluated the binding.
    pub view: ViewId,
    /// Position of the binding in evaluation order within the view.
    pub binding_index: u32,
    /// Declaration slot the binding targets.
    pub slot: u32,
}

impl fmt::Display for BindingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "view {}, binding {}, slot {}",
            self.view.index(),
            self.binding_index,
            self.slot
        )
    }
}

/// A failure raised while checking a view.
///
/// Any error aborts the pass that produced it. Views visited before the
/// failure keep their committed bindings; the failing view keeps its
/// dirty flags so that the next pass retries it.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CheckError {
    /// A verification pass saw a binding whose value differs from the one
    /// committed by the preceding pass.
    #[error(
        "ExpressionChangedAfterItHasBeenCheckedError: Expression has changed after it was checked ({location}). Previous value: '{previous}'. Current value: '{current}'."
    )]
    ExpressionChanged {
        /// Where the binding lives.
        location: BindingLocation,
        /// Value committed by the last normal pass.
        previous: BindingValue,
        /// Value computed by the verification pass.
        current: BindingValue,
    },
    /// A verification pass saw an embedded-view list that differs from the
    /// one produced by the preceding pass.
    #[error(
        "ExpressionChangedAfterItHasBeenCheckedError: Embedded views of {container:?} have changed after they were checked."
    )]
    StructureChanged {
        /// The container whose view list changed.
        container: ContainerId,
    },
    /// A creation-only primitive was used outside creation mode.
    #[error("`{primitive}` at slot {slot} of {view:?} may only be used in creation mode")]
    CreationOnly {
        /// The view being checked.
        view: ViewId,
        /// The slot passed to the primitive.
        slot: u32,
        /// The primitive's name.
        primitive: &'static str,
    },
    /// A binding or container operation targeted a slot that was never
    /// declared, or was declared as something else.
    #[error("slot {slot} of {view:?} was not declared as {expected}")]
    UnknownSlot {
        /// The view being checked.
        view: ViewId,
        /// The offending slot.
        slot: u32,
        /// What the operation needed the slot to be.
        expected: &'static str,
    },
    /// A check function used the engine in a way its state does not allow.
    #[error("invalid check function invocation in {view:?}: {reason}")]
    InvalidInvocation {
        /// The view being checked.
        view: ViewId,
        /// What went wrong.
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn expression_changed_message_names_both_values() {
        let err = CheckError::ExpressionChanged {
            location: BindingLocation {
                view: ViewId {
                    idx: 1,
                    generation: 0,
                },
                binding_index: 0,
                slot: 2,
            },
            previous: 1.into(),
            current: 2.into(),
        };
        let msg = err.to_string();
        assert!(
            msg.starts_with("ExpressionChangedAfterItHasBeenCheckedError"),
            "{msg}"
        );
        assert!(msg.contains("view 1, binding 0, slot 2"), "{msg}");
        assert!(
            msg.contains("Previous value: '1'. Current value: '2'"),
            "{msg}"
        );
    }
}
