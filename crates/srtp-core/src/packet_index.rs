//! 48-bit packet-index reconstruction across SEQ wrap (spec §4.9, RFC
//! 3711 §3.3.1).

/// Reconstruct the 48-bit packet index `PI = SEQ + (v << 16)` relative
/// to the stored highest received sequence number `s_l` and the current
/// ROC. Does not mutate anything; the caller commits ROC/`s_l` only
/// after authentication succeeds (spec §4.16 step 4).
pub fn guess_index(seq: u16, s_l: u16, roc: u32) -> u64 {
    let v = if (s_l as u32) < (1 << 15) {
        if (seq as i64 - s_l as i64) > (1 << 15) {
            roc.wrapping_sub(1)
        } else {
            roc
        }
    } else if (s_l as i64 - (1 << 15)) > seq as i64 {
        roc.wrapping_add(1)
    } else {
        roc
    };
    (seq as u64) + ((v as u64) << 16)
}

/// After a successful decrypt with a guessed index, update `(roc, s_l)`
/// per spec §4.9: wrap is detected when the new SEQ is less than the
/// previous `s_l`.
pub fn commit_index(seq: u16, s_l: &mut u16, roc: &mut u32) {
    if seq < *s_l {
        *roc = roc.wrapping_add(1);
    }
    *s_l = seq;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_region_uses_current_roc() {
        assert_eq!(guess_index(100, 90, 5), (5u64 << 16) + 100);
    }

    #[test]
    fn forward_wrap_from_high_seq_uses_roc_plus_one() {
        // s_l near the top of the space, seq has wrapped low: v = ROC+1.
        let pi = guess_index(10, 65530, 5);
        assert_eq!(pi, (6u64 << 16) + 10);
    }

    #[test]
    fn spurious_old_packet_near_wrap_uses_roc_minus_one() {
        // s_l low (just wrapped), an old pre-wrap packet with a high SEQ arrives.
        let pi = guess_index(65000, 5, 5);
        assert_eq!(pi, (4u64 << 16) + 65000);
    }

    #[test]
    fn commit_advances_roc_on_wrap() {
        let mut s_l = 65530u16;
        let mut roc = 5u32;
        commit_index(10, &mut s_l, &mut roc);
        assert_eq!(s_l, 10);
        assert_eq!(roc, 6);
    }

    #[test]
    fn commit_holds_roc_without_wrap() {
        let mut s_l = 100u16;
        let mut roc = 5u32;
        commit_index(150, &mut s_l, &mut roc);
        assert_eq!(s_l, 150);
        assert_eq!(roc, 5);
    }

    #[test]
    fn invariant_case_sl_65000_roc_5() {
        // spec.md §8.1 invariant 8 scenario.
        let pi = guess_index(0, 65000, 5);
        assert_eq!(pi, (6u64 << 16));
    }
}
