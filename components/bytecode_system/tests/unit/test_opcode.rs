//! Tests for the OpCode enum and its byte encoding

use bytecode_system::OpCode;

#[test]
fn test_every_opcode_round_trips_through_its_byte() {
    for op in OpCode::ALL {
        assert_eq!(OpCode::try_from(u8::from(op)), Ok(op));
    }
}

#[test]
fn test_bytes_past_the_last_opcode_are_rejected() {
    for byte in (OpCode::ALL.len() as u8)..=u8::MAX {
        assert_eq!(OpCode::try_from(byte), Err(byte));
    }
}

#[test]
fn test_jump_family_uses_two_byte_operands() {
    for op in OpCode::ALL {
        if op.is_jump() {
            assert_eq!(op.operand_width(), 2, "{:?}", op);
        } else {
            assert!(op.operand_width() <= 1, "{:?}", op);
        }
    }
}

#[test]
fn test_mnemonics_are_unique() {
    let mut names: Vec<_> = OpCode::ALL.iter().map(|op| op.mnemonic()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), OpCode::ALL.len());
}
