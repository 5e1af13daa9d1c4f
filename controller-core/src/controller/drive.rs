//! Drive demand derived from the pads while driving.

use crate::board::{OutputId, OutputSink};
use crate::head_array::{PadInputs, Sensor};

/// Speed axis demand.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Speed {
    #[default]
    Stopped,
    Forward,
    Reverse,
}

/// Direction axis demand.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Straight,
    Left,
    Right,
}

/// Full-scale digital demand on both axes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DriveDemand {
    pub speed: Speed,
    pub direction: Direction,
}

impl DriveDemand {
    /// No demand on either axis.
    pub const NEUTRAL: Self = Self {
        speed: Speed::Stopped,
        direction: Direction::Straight,
    };

    /// Maps the resolved pads onto the two axes.
    ///
    /// Left wins over right and forward over reverse, although the head array
    /// never reports an opposing pair together. The back pad produces no
    /// demand while reverse is suppressed.
    #[must_use]
    pub fn from_pads<P>(pads: &P, reverse_suppressed: bool) -> Self
    where
        P: PadInputs + ?Sized,
    {
        if pads.pads_in_neutral_state() {
            return Self::NEUTRAL;
        }

        let direction = if pads.digital_input_value(Sensor::Left) {
            Direction::Left
        } else if pads.digital_input_value(Sensor::Right) {
            Direction::Right
        } else {
            Direction::Straight
        };

        let speed = if pads.digital_input_value(Sensor::Center) {
            Speed::Forward
        } else if pads.digital_input_value(Sensor::Back) && !reverse_suppressed {
            Speed::Reverse
        } else {
            Speed::Stopped
        };

        Self { speed, direction }
    }

    /// Returns `true` when neither axis is demanded.
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        matches!(self.speed, Speed::Stopped) && matches!(self.direction, Direction::Straight)
    }

    /// Writes all four demand outputs.
    pub fn apply<O>(&self, sink: &mut O)
    where
        O: OutputSink + ?Sized,
    {
        sink.set_output(OutputId::ForwardDemand, self.speed == Speed::Forward);
        sink.set_output(OutputId::ReverseDemand, self.speed == Speed::Reverse);
        sink.set_output(OutputId::LeftDemand, self.direction == Direction::Left);
        sink.set_output(OutputId::RightDemand, self.direction == Direction::Right);
    }
}
