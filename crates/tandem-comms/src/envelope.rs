//! Delivery metadata wrapped around a [`Message`].

use tandem_core::{RobotId, Team};

use crate::Message;

/// Where an envelope is headed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Address {
    /// Point-to-point to a single robot.
    Robot(RobotId),
    /// Fan-out to every robot on `team` except the sender.  Broadcasts
    /// never cross team boundaries.
    Team(Team),
}

/// One message in flight.
///
/// Ownership: the sender hands the envelope to the bus at send time and
/// keeps nothing; the bus exclusively owns delivery scheduling until the
/// tick driver routes the envelope into the recipient's inbox.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    pub from: RobotId,
    pub to:   Address,
    pub msg:  Message,
}

impl Envelope {
    /// Point-to-point envelope.
    pub fn to_robot(from: RobotId, to: RobotId, msg: Message) -> Self {
        Self { from, to: Address::Robot(to), msg }
    }

    /// Same-team broadcast envelope.
    pub fn to_team(from: RobotId, team: Team, msg: Message) -> Self {
        Self { from, to: Address::Team(team), msg }
    }
}
