//! Magic-eater absorbed devices

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use super::{
    Availability, CategoryStyle, PowerCatalog, PowerDescriptor, PowerExtra, PowerSource, Resource,
};
use crate::player::PlayerState;
use crate::repeat::RepeatContext;

/// Kind of absorbed device
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum DeviceKind {
    Staff,
    Wand,
    Rod,
}

/// Minimum level and base failure of a device of the given object level.
///
/// Rods are easier than their object level suggests.
pub fn device_fail_profile(kind: DeviceKind, level: i32) -> (i32, i32) {
    let level = match kind {
        DeviceKind::Rod => (level * 5 / 6 - 5).max(0),
        DeviceKind::Staff | DeviceKind::Wand => level,
    };
    (level / 2, level * 4 / 5 + 20)
}

/// Staffs, wands and rods absorbed by a magic-eater
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MagicEaterSource;

impl PowerSource for MagicEaterSource {
    fn context(&self) -> RepeatContext {
        RepeatContext::MagicEater
    }

    fn noun(&self) -> &'static str {
        "magic"
    }

    fn verb(&self) -> &'static str {
        "use"
    }

    fn build_catalog(&self, player: &PlayerState) -> PowerCatalog {
        let mut catalog = PowerCatalog::new().with_style(CategoryStyle::PickFirst);
        for kind in DeviceKind::iter() {
            let powers = player
                .devices
                .iter()
                .enumerate()
                .filter(|(_, device)| device.kind == kind)
                .map(|(slot, device)| {
                    let (min_level, base_fail) = device_fail_profile(kind, device.level);
                    let availability = if device.charges <= 0 || device.recharging > 0 {
                        Availability::Exhausted
                    } else {
                        Availability::Ready
                    };
                    PowerDescriptor::new(
                        device.name.clone(),
                        min_level,
                        1,
                        base_fail,
                        PowerExtra::Device {
                            kind,
                            slot,
                            charges: device.charges,
                        },
                    )
                    .paid_with(Resource::Charges { slot })
                    .with_availability(availability)
                })
                .collect();
            catalog.push_category(kind.to_string(), powers);
        }
        catalog
    }

    fn describe_row(&self, power: &PowerDescriptor, player: &PlayerState) -> String {
        match power.extra {
            PowerExtra::Device { kind, slot, charges } => {
                let recharging = player.devices.get(slot).map(|d| d.recharging).unwrap_or(0);
                match kind {
                    DeviceKind::Rod if recharging > 0 => format!("recharging ({})", recharging),
                    DeviceKind::Rod => "ready".to_string(),
                    DeviceKind::Staff | DeviceKind::Wand => format!("{} charges", charges),
                }
            }
            _ => String::new(),
        }
    }

    fn nothing_message(&self) -> String {
        "You don't have any magic!".to_string()
    }
}
