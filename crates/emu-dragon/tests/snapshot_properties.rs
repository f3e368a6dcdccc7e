//! Damaged snapshots are rejected without touching the machine.

use emu_dragon::{CYCLES_PER_LINE, Dragon, DragonConfig, DragonError, DragonModel, snapshot};
use proptest::prelude::*;

fn make_dragon() -> Dragon {
    let mut rom = vec![0x12; 0x4000];
    rom[..5].copy_from_slice(&[0x7C, 0x04, 0x00, 0x20, 0xFB]);
    rom[0x3FFE] = 0x80;
    rom[0x3FFF] = 0x00;
    let mut dragon =
        Dragon::new(DragonConfig::new(DragonModel::Dragon32, rom)).expect("valid ROM");
    dragon.run_frames(2);
    dragon
}

/// Offset of a section's payload in a saved image.
fn payload_at(data: &[u8], tag: &[u8; 4]) -> usize {
    let mut pos = 10;
    while &data[pos..pos + 4] != tag {
        let len = &data[pos + 4..pos + 8];
        pos += 8 + u32::from_le_bytes([len[0], len[1], len[2], len[3]]) as usize;
    }
    pos + 8
}

fn is_corrupt(result: emu_dragon::Result<()>) -> bool {
    matches!(result, Err(DragonError::SnapshotCorrupt(_)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn truncated_snapshot_never_applies(cut in 0usize..1000) {
        let mut dragon = make_dragon();
        let good = snapshot::save(&dragon);
        let len = cut.min(good.len() - 1);
        prop_assert!(snapshot::load(&mut dragon, &good[..len]).is_err());
        prop_assert_eq!(snapshot::save(&dragon), good);
    }

    #[test]
    fn corrupted_header_bytes_never_panic(pos in 0usize..64, value in any::<u8>()) {
        let mut dragon = make_dragon();
        let good = snapshot::save(&dragon);
        let mut bad = good.clone();
        bad[pos] = value;
        if snapshot::load(&mut dragon, &bad).is_err() {
            prop_assert_eq!(snapshot::save(&dragon), good);
        }
    }

    #[test]
    fn frame_carry_beyond_one_instruction_is_rejected(carry in CYCLES_PER_LINE..=u32::MAX) {
        let mut dragon = make_dragon();
        let good = snapshot::save(&dragon);
        let mut bad = good.clone();
        let at = payload_at(&bad, b"SCHD");
        bad[at..at + 4].copy_from_slice(&carry.to_le_bytes());
        prop_assert!(is_corrupt(snapshot::load(&mut dragon, &bad)));
        prop_assert_eq!(snapshot::save(&dragon), good);
    }

    #[test]
    fn beam_row_past_the_frame_is_rejected(row in 241u16..) {
        let mut dragon = make_dragon();
        let good = snapshot::save(&dragon);
        let mut bad = good.clone();
        let at = payload_at(&bad, b"VID ") + 16;
        bad[at..at + 2].copy_from_slice(&row.to_le_bytes());
        prop_assert!(is_corrupt(snapshot::load(&mut dragon, &bad)));
        prop_assert_eq!(snapshot::save(&dragon), good);
    }
}
