use super::names;

/// Addressing-mode masks for an instruction's first, second and third
/// parameter. A set bit in the owning opcode byte marks the parameter as a
/// variable reference instead of an immediate. The assignment is always
/// left-to-right; decode and encode must agree on it exactly.
pub const PARAM_1: u8 = 0x80;
pub const PARAM_2: u8 = 0x40;
pub const PARAM_3: u8 = 0x20;

/// A decoded variable reference.
///
/// The two high bits of the raw 16-bit number select the class: bit 15
/// marks a bit variable, else bit 14 a local, else bit 13 an indexed
/// variable, else a global. Bit variables split their payload into a
/// 12-bit number and a 3-bit bit index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarSpec {
    Global(u16),
    Local(u16),
    Bit { num: u16, bit: u8 },
    Indexed(u16),
}

impl VarSpec {
    #[must_use]
    pub fn decode(raw: u16) -> VarSpec {
        if raw & 0x8000 != 0 {
            VarSpec::Bit {
                num: raw & 0x0FFF,
                bit: ((raw >> 12) & 0x7) as u8,
            }
        } else if raw & 0x4000 != 0 {
            VarSpec::Local(raw & 0x3FFF)
        } else if raw & 0x2000 != 0 {
            VarSpec::Indexed(raw & 0x1FFF)
        } else {
            VarSpec::Global(raw)
        }
    }

    /// The exact inverse of [`VarSpec::decode`] on every decoded value.
    #[must_use]
    pub fn encode(self) -> u16 {
        match self {
            VarSpec::Global(num) => num & 0x1FFF,
            VarSpec::Local(num) => 0x4000 | (num & 0x3FFF),
            VarSpec::Bit { num, bit } => 0x8000 | (u16::from(bit & 0x7) << 12) | (num & 0x0FFF),
            VarSpec::Indexed(num) => 0x2000 | (num & 0x1FFF),
        }
    }
}

impl std::fmt::Display for VarSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarSpec::Global(num) => match names::global_var_name(*num) {
                Some(name) => write!(f, "{name}"),
                None => write!(f, "Var[{num}]"),
            },
            VarSpec::Local(num) => write!(f, "Local[{num}]"),
            VarSpec::Bit { num, bit } => write!(f, "Bit[{num}#{bit}]"),
            VarSpec::Indexed(num) => write!(f, "Index[{num}]"),
        }
    }
}

/// An operand that is either an immediate value or a variable reference.
///
/// Which case is present is never encoded in the parameter bytes
/// themselves; it comes from the addressing-mode bit in the owning opcode
/// byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param<T> {
    Imm(T),
    Var(VarSpec),
}

pub type ByteParam = Param<u8>;
pub type WordParam = Param<u16>;

impl<T> Param<T> {
    #[must_use]
    pub fn is_var(&self) -> bool {
        matches!(self, Param::Var(_))
    }

    /// The addressing-mode contribution of this parameter to its opcode
    /// byte: `mask` when the parameter is a variable, zero otherwise.
    #[must_use]
    pub fn flag(&self, mask: u8) -> u8 {
        if self.is_var() { mask } else { 0 }
    }
}

/// Composes an opcode byte from its base value and parameter flags.
#[must_use]
pub fn compose_opcode(base: u8, flags: &[u8]) -> u8 {
    flags.iter().fold(base, |op, &flag| op | flag)
}

impl<T: std::fmt::Display> std::fmt::Display for Param<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Param::Imm(value) => write!(f, "{value}"),
            Param::Var(var) => write!(f, "{var}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn class_selection_follows_high_bits() {
        assert_eq!(VarSpec::decode(0x0001), VarSpec::Global(1));
        assert_eq!(VarSpec::decode(0x1FFF), VarSpec::Global(0x1FFF));
        assert_eq!(VarSpec::decode(0x4005), VarSpec::Local(5));
        assert_eq!(VarSpec::decode(0x2010), VarSpec::Indexed(0x10));
        assert_eq!(VarSpec::decode(0x8001), VarSpec::Bit { num: 1, bit: 0 });
        assert_eq!(
            VarSpec::decode(0xB123),
            VarSpec::Bit { num: 0x123, bit: 3 }
        );
    }

    #[test]
    fn bit_takes_precedence_over_local_and_indexed() {
        // 0xE000 has bits 15, 14 and 13 all set; bit 15 wins.
        assert!(matches!(VarSpec::decode(0xE000), VarSpec::Bit { .. }));
        // 0x6000 has bits 14 and 13; bit 14 wins.
        assert!(matches!(VarSpec::decode(0x6000), VarSpec::Local(_)));
    }

    #[test]
    fn param_flags_compose() {
        let imm: WordParam = Param::Imm(7);
        let var: WordParam = Param::Var(VarSpec::Global(3));
        assert_eq!(
            compose_opcode(0x1E, &[var.flag(PARAM_1), imm.flag(PARAM_2), var.flag(PARAM_3)]),
            0x1E | PARAM_1 | PARAM_3
        );
    }

    proptest! {
        #[test]
        fn decode_is_total_and_encode_inverts_it(raw in any::<u16>()) {
            let spec = VarSpec::decode(raw);
            // Exactly one class is selected per the bit rules.
            let expected_class = if raw & 0x8000 != 0 {
                "bit"
            } else if raw & 0x4000 != 0 {
                "local"
            } else if raw & 0x2000 != 0 {
                "indexed"
            } else {
                "global"
            };
            let class = match spec {
                VarSpec::Bit { .. } => "bit",
                VarSpec::Local(_) => "local",
                VarSpec::Indexed(_) => "indexed",
                VarSpec::Global(_) => "global",
            };
            prop_assert_eq!(class, expected_class);
        }

        #[test]
        fn encode_is_the_exact_inverse(raw in any::<u16>()) {
            prop_assert_eq!(VarSpec::decode(raw).encode(), raw);
        }
    }
}
