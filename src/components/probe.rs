//! Oscilloscope probe terminals.
//!
//! The probe does not conduct; each of its terminals has a fixed role:
//!
//! | Index | Role      | Lead color |
//! |-------|-----------|------------|
//! | 0     | Ground    | Black      |
//! | 1     | Channel A | Red        |
//! | 2     | Channel B | Blue       |
//! | 3     | Input     | Green      |

/// Role of one oscilloscope terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeTerminal {
    Ground,
    ChannelA,
    ChannelB,
    Input,
}

impl ProbeTerminal {
    /// All roles in terminal index order.
    pub const ALL: [ProbeTerminal; 4] = [
        ProbeTerminal::Ground,
        ProbeTerminal::ChannelA,
        ProbeTerminal::ChannelB,
        ProbeTerminal::Input,
    ];

    /// Role of the terminal at `index`, if it is one of the four probe leads.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            ProbeTerminal::Ground => 0,
            ProbeTerminal::ChannelA => 1,
            ProbeTerminal::ChannelB => 2,
            ProbeTerminal::Input => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProbeTerminal::Ground => "Ground",
            ProbeTerminal::ChannelA => "Channel A",
            ProbeTerminal::ChannelB => "Channel B",
            ProbeTerminal::Input => "Input",
        }
    }

    /// Display color of the lead.
    pub fn color(&self) -> &'static str {
        match self {
            ProbeTerminal::Ground => "Black",
            ProbeTerminal::ChannelA => "Red",
            ProbeTerminal::ChannelB => "Blue",
            ProbeTerminal::Input => "Green",
        }
    }

    /// Terminal offset from the oscilloscope's placement point.
    pub(crate) fn offset(&self) -> (f64, f64) {
        match self {
            ProbeTerminal::Ground => (45.0, -25.0),
            ProbeTerminal::ChannelA => (45.0, 5.0),
            ProbeTerminal::ChannelB => (45.0, 20.0),
            ProbeTerminal::Input => (60.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for role in ProbeTerminal::ALL {
            assert_eq!(ProbeTerminal::from_index(role.index()), Some(role));
        }
        assert_eq!(ProbeTerminal::from_index(4), None);
    }
}
