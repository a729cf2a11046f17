//! Rotation-canonical marker identifiers.
//!
//! A square marker is rotationally ambiguous: the same printed pattern yields
//! four different interior codes depending on which corner the rectification
//! happened to map to the top-left. The decoder resolves this by testing all
//! four rotations and picking one canonical representative.

use serde::{Deserialize, Serialize};

/// Strategy for picking the canonical rotation among the four candidates.
///
/// Markers here are free-form (no dictionary), so the rule only has to be
/// deterministic and rotation-invariant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationRule {
    /// Rotation with the numerically smallest interior code.
    #[default]
    SmallestCode,
    /// Rotation with the numerically largest interior code.
    LargestCode,
}

/// A rotation-normalized marker identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerId {
    /// Canonical interior code (16 bits at the default 6x6 grid).
    pub code: u64,
    /// Clockwise quarter turns applied to the observed patch to reach the
    /// canonical orientation (`0..=3`).
    pub rotation: u8,
}

/// One clockwise quarter turn of a `side` x `side` interior code: the cell at
/// `(x, y)` lands at `(side-1-y, x)`.
fn quarter_turn_cw(code: u64, side: usize) -> u64 {
    let mut turned = 0u64;
    for src_y in 0..side {
        for src_x in 0..side {
            if (code >> (src_y * side + src_x)) & 1 == 1 {
                let dst_x = side - 1 - src_y;
                let dst_y = src_x;
                turned |= 1u64 << (dst_y * side + dst_x);
            }
        }
    }
    turned
}

/// Rotate an interior code (row-major bits, as read by
/// [`crate::BitPatch::inner_code`]) by `quarter_turns` clockwise quarter
/// turns. `side` is the interior width, i.e. `BitPatch::inner_size`.
pub fn rotate_inner_code(code: u64, side: usize, quarter_turns: u8) -> u64 {
    let mut out = code;
    for _ in 0..(quarter_turns & 3) {
        out = quarter_turn_cw(out, side);
    }
    out
}

/// Resolve the canonical rotation of an observed interior code.
pub fn canonicalize_code(observed: u64, side: usize, rule: RotationRule) -> MarkerId {
    let mut best = MarkerId {
        code: observed,
        rotation: 0,
    };

    let mut cand = observed;
    for rot in 1u8..4 {
        cand = quarter_turn_cw(cand, side);
        let better = match rule {
            RotationRule::SmallestCode => cand < best.code,
            RotationRule::LargestCode => cand > best.code,
        };
        if better {
            best = MarkerId {
                code: cand,
                rotation: rot,
            };
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    // asymmetric 4x4 pattern: no two rotations coincide
    const PATTERN: u64 = 0b1100_0010_0001_0111;

    #[test]
    fn rotate_moves_top_left_clockwise() {
        // single dark bit at inner (0,0) of a 4x4 code
        let code = 1u64;
        assert_eq!(rotate_inner_code(code, 4, 1), 1 << 3); // -> (3,0)
        assert_eq!(rotate_inner_code(code, 4, 2), 1 << 15); // -> (3,3)
        assert_eq!(rotate_inner_code(code, 4, 3), 1 << 12); // -> (0,3)
    }

    #[test]
    fn quarter_turns_compose() {
        // a turn and its complement cancel
        assert_eq!(
            rotate_inner_code(rotate_inner_code(PATTERN, 4, 1), 4, 3),
            PATTERN
        );
        // two half turns are a full turn
        assert_eq!(
            rotate_inner_code(rotate_inner_code(PATTERN, 4, 2), 4, 2),
            PATTERN
        );
        // 1 + 2 turns equal 3 turns
        assert_eq!(
            rotate_inner_code(rotate_inner_code(PATTERN, 4, 1), 4, 2),
            rotate_inner_code(PATTERN, 4, 3)
        );
    }

    #[test]
    fn rotation_preserves_popcount_on_odd_grid() {
        // center cell of a 3x3 interior stays put, the ring moves
        let code = 0b000_010_000u64 | 0b100_000_001u64;
        for rot in 0u8..4 {
            let r = rotate_inner_code(code, 3, rot);
            assert_eq!(r.count_ones(), code.count_ones());
            assert_eq!((r >> 4) & 1, 1, "center bit must stay at rot {rot}");
        }
    }

    #[test]
    fn canonical_id_is_rotation_invariant() {
        let canon = canonicalize_code(PATTERN, 4, RotationRule::SmallestCode);

        for rot in 0u8..4 {
            let observed = rotate_inner_code(PATTERN, 4, rot);
            let id = canonicalize_code(observed, 4, RotationRule::SmallestCode);
            assert_eq!(id.code, canon.code, "rotation {rot} changed the id");
        }
    }

    #[test]
    fn reported_rotation_restores_canonical_code() {
        let base = 0b1000_0000_0000_0110_u64;
        for rot in 0u8..4 {
            let observed = rotate_inner_code(base, 4, rot);
            let id = canonicalize_code(observed, 4, RotationRule::SmallestCode);
            assert_eq!(rotate_inner_code(observed, 4, id.rotation), id.code);
        }
    }

    #[test]
    fn largest_code_rule_flips_selection() {
        let base = 1u64; // rotations: 1, 8, 0x8000, 0x1000
        let small = canonicalize_code(base, 4, RotationRule::SmallestCode);
        let large = canonicalize_code(base, 4, RotationRule::LargestCode);
        assert_eq!(small.code, 1);
        assert_eq!(small.rotation, 0);
        assert_eq!(large.code, 0x8000);
        assert_eq!(large.rotation, 2);
    }
}
