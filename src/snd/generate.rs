//! Fresh .snd document generation
//!
//! Builds a complete sound bank from cockpit geometry: a preserved or
//! synthesized header, an optional selection from the canned sound
//! library, and one attachment entry per unique manipulator command.
//! Pure text transform; deterministic for identical inputs.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

use crate::constants::snd as kw;
use crate::obj::Manipulator;
use crate::snd::entry::{EntryIdAllocator, Placement, SoundEntry, TriggerKind};

/// Synthesized when no template document supplies a header
const DEFAULT_HEADER: &str = "A\n\
    1000\n\
    ACF_SOUNDS\n\
    \n\
    #################################################\n\
    # Generated Sound Bank                          #\n\
    # Auto-generated by xsnd                        #\n\
    #################################################\n\
    \n\
    DISABLE_LEGACY_ALERT_SOUNDS\n\
    \n";

const SECTION_BANNER: &str =
    "#############################################################################################\n";

/// Fixed library of parameter-free template blocks. Inclusion is the only
/// knob; the block text never varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CannedSound {
    Engine,
    Propeller,
    Jet,
    Reverser,
    Gear,
    Tires,
    GroundRoll,
    Brakes,
    Flaps,
    Spoilers,
    TrimWheel,
    StallWarning,
    GearWarning,
    Overspeed,
    MasterWarning,
    Wind,
    Rain,
}

impl CannedSound {
    /// Emission order for generated documents
    pub const ALL: [CannedSound; 17] = [
        CannedSound::Engine,
        CannedSound::Propeller,
        CannedSound::Jet,
        CannedSound::Reverser,
        CannedSound::Gear,
        CannedSound::Tires,
        CannedSound::GroundRoll,
        CannedSound::Brakes,
        CannedSound::Flaps,
        CannedSound::Spoilers,
        CannedSound::TrimWheel,
        CannedSound::StallWarning,
        CannedSound::GearWarning,
        CannedSound::Overspeed,
        CannedSound::MasterWarning,
        CannedSound::Wind,
        CannedSound::Rain,
    ];

    /// The template text. Trim wheel and master warning contribute two
    /// blocks each; everything else one.
    pub fn block(self) -> &'static str {
        match self {
            CannedSound::Engine => {
                "# Engine Sound\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/engine/running\n\
                 \tVEH_PART engine 0\n\
                 \tPARAM_DREF_IDX 0\n\
                 \tEVENT_START_COND sim/flightmodel2/engines/engine_rotation_speed_rad_sec[0] > 1\n\
                 \tEVENT_END_COND sim/flightmodel2/engines/engine_rotation_speed_rad_sec[0] < 1\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::Propeller => {
                "# Propeller Sound\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/propeller/running\n\
                 \tVEH_PART prop 0\n\
                 \tPARAM_DREF_IDX 0\n\
                 \tEVENT_START_COND sim/flightmodel2/engines/prop_rotation_speed_rad_sec[0] > 1\n\
                 \tEVENT_END_COND sim/flightmodel2/engines/prop_rotation_speed_rad_sec[0] < 1\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::Jet => {
                "# Jet Engine Sound\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/jet/engine\n\
                 \tVEH_PART engine 0\n\
                 \tPARAM_DREF_IDX 0\n\
                 \tEVENT_START_COND sim/flightmodel2/engines/N1_percent[0] > 5\n\
                 \tEVENT_END_COND sim/flightmodel2/engines/N1_percent[0] < 5\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::Reverser => {
                "# Thrust Reverser\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/reversers/deploy\n\
                 \tVEH_PART engine 0\n\
                 \tEVENT_START_COND sim/flightmodel2/engines/thrust_reverser_deploy_ratio[0] > 0.1\n\
                 \tEVENT_END_COND sim/flightmodel2/engines/thrust_reverser_deploy_ratio[0] < 0.1\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::Gear => {
                "# Landing Gear Extension\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/gear/extension\n\
                 \tVEH_XYZ 0.000 0.000 0.000\n\
                 \tEVENT_START_COND sim/flightmodel2/gear/deploy_ratio[0] > 0\n\
                 \tEVENT_END_COND sim/flightmodel2/gear/deploy_ratio[0] == 0 OR sim/flightmodel2/gear/deploy_ratio[0] == 1\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::Tires => {
                "# Tire Squeal on Landing\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/tires/squeal\n\
                 \tVEH_XYZ 0.000 -1.000 0.000\n\
                 \tEVENT_START_COND sim/flightmodel2/gear/tire_vertical_deflection_mtr[0] > 0.01\n\
                 \tEVENT_END_COND sim/flightmodel2/gear/on_ground[0] == 0\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::GroundRoll => {
                "# Ground Roll Rumble\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/ground/rumble\n\
                 \tVEH_XYZ 0.000 0.000 0.000\n\
                 \tEVENT_START_COND sim/flightmodel2/gear/on_ground[0] == 1 AND sim/flightmodel/position/groundspeed > 5\n\
                 \tEVENT_END_COND sim/flightmodel2/gear/on_ground[0] == 0 OR sim/flightmodel/position/groundspeed < 5\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::Brakes => {
                "# Brake Squeal\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/brakes/squeal\n\
                 \tVEH_XYZ 0.000 -0.500 0.000\n\
                 \tEVENT_START_COND sim/cockpit2/controls/parking_brake_ratio > 0.5 AND sim/flightmodel/position/groundspeed > 1\n\
                 \tEVENT_END_COND sim/cockpit2/controls/parking_brake_ratio < 0.5 OR sim/flightmodel/position/groundspeed < 1\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::Flaps => {
                "# Flaps Extension\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/flaps/extension\n\
                 \tVEH_XYZ 0.000 0.000 2.000\n\
                 \tEVENT_START_COND sim/flightmodel2/controls/flap_handle_deploy_ratio > 0\n\
                 \tEVENT_END_COND sim/flightmodel2/wing/flap1_deg[0] == sim/aircraft/overflow/acf_flap_detents[0] OR sim/flightmodel2/wing/flap1_deg[0] == 0\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::Spoilers => {
                "# Spoilers/Speedbrakes\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/spoilers/deploy\n\
                 \tVEH_XYZ 0.000 0.000 1.000\n\
                 \tEVENT_START_COND sim/flightmodel2/controls/speedbrake_ratio > 0.1\n\
                 \tEVENT_END_COND sim/flightmodel2/controls/speedbrake_ratio < 0.1\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::TrimWheel => {
                "# Trim Wheel\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/trim/wheel\n\
                 \tVEH_XYZ 0.000 0.500 0.000\n\
                 \tEVENT_CMND_CUE sim/flight_controls/pitch_trim_down\n\
                 END_SOUND_ATTACHMENT\n\
                 \n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/trim/wheel\n\
                 \tVEH_XYZ 0.000 0.500 0.000\n\
                 \tEVENT_CMND_CUE sim/flight_controls/pitch_trim_up\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::StallWarning => {
                "# Stall Warning\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/warning/stall\n\
                 \tVEH_XYZ 0.000 0.500 -0.500\n\
                 \tEVENT_START_COND sim/flightmodel/failures/stallwarning_on == 1\n\
                 \tEVENT_END_COND sim/flightmodel/failures/stallwarning_on == 0\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::GearWarning => {
                "# Gear Warning Horn\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/warning/gear_horn\n\
                 \tVEH_XYZ 0.000 0.500 -0.500\n\
                 \tEVENT_START_COND sim/cockpit2/annunciators/gear_warning == 1\n\
                 \tEVENT_END_COND sim/cockpit2/annunciators/gear_warning == 0\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::Overspeed => {
                "# Overspeed Warning\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/warning/overspeed\n\
                 \tVEH_XYZ 0.000 0.500 -0.500\n\
                 \tEVENT_START_COND sim/flightmodel/failures/over_vne == 1\n\
                 \tEVENT_END_COND sim/flightmodel/failures/over_vne == 0\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::MasterWarning => {
                "# Master Warning/Caution\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/warning/master_warning\n\
                 \tVEH_XYZ 0.000 0.500 -0.500\n\
                 \tEVENT_START_COND sim/cockpit2/annunciators/master_warning == 1\n\
                 \tEVENT_END_COND sim/cockpit2/annunciators/master_warning == 0\n\
                 END_SOUND_ATTACHMENT\n\
                 \n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/warning/master_caution\n\
                 \tVEH_XYZ 0.000 0.500 -0.500\n\
                 \tEVENT_START_COND sim/cockpit2/annunciators/master_caution == 1\n\
                 \tEVENT_END_COND sim/cockpit2/annunciators/master_caution == 0\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::Wind => {
                "# Wind Noise\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/environment/wind\n\
                 \tVEH_XYZ 0.000 0.500 0.000\n\
                 \tEVENT_START_COND sim/flightmodel/position/indicated_airspeed > 30\n\
                 \tEVENT_END_COND sim/flightmodel/position/indicated_airspeed < 30\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
            CannedSound::Rain => {
                "# Rain on Canopy\n\
                 BEGIN_SOUND_ATTACHMENT\n\
                 \tEVENT_NAME /aircraft/environment/rain\n\
                 \tVEH_XYZ 0.000 1.000 0.000\n\
                 \tEVENT_START_COND sim/weather/rain_percent > 0.1\n\
                 \tEVENT_END_COND sim/weather/rain_percent < 0.1\n\
                 END_SOUND_ATTACHMENT\n\n"
            }
        }
    }
}

/// Knobs for one generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Event path applied to every manipulator-derived entry
    pub event_name: String,
    /// Emit EVENT_CMND_HOLD_CUE instead of EVENT_CMND_UP
    pub use_hold_cue: bool,
    /// Follow each entry with a release-triggered duplicate
    pub duplicate_for_release: bool,
    /// Canned blocks to include, any order; emitted in library order
    pub canned: Vec<CannedSound>,
}

/// Counters describing one generation run
#[derive(Debug, Default, Clone, Serialize)]
pub struct GenerateStats {
    pub unique_commands: usize,
    pub manipulator_entries: usize,
    pub canned_blocks: usize,
    pub total_entries: usize,
}

/// Builds complete .snd documents, optionally reusing the header of an
/// existing template document.
pub struct Generator {
    template: Option<String>,
}

impl Generator {
    pub fn new(template: Option<String>) -> Self {
        Self { template }
    }

    /// Header: template text up to its first begin marker when the
    /// template has one, otherwise the synthesized default.
    fn header(&self) -> String {
        if let Some(template) = &self.template {
            if let Some(idx) = template.find(kw::BEGIN_MARKER) {
                if idx > 0 {
                    return template[..idx].to_string();
                }
            }
        }
        DEFAULT_HEADER.to_string()
    }

    /// Emit a full document. Manipulators are deduplicated by command,
    /// first occurrence in input order winning, matching the rule the
    /// updater's command map applies during matching.
    pub fn generate(
        &self,
        manipulators: &[Manipulator],
        options: &GenerateOptions,
    ) -> (String, GenerateStats) {
        let mut out = self.header();
        let mut stats = GenerateStats::default();
        let mut ids = EntryIdAllocator::new();

        out.push_str("# Template Sound Blocks\n");
        out.push_str(SECTION_BANNER);
        for kind in CannedSound::ALL {
            if options.canned.contains(&kind) {
                let block = kind.block();
                stats.canned_blocks += block.matches(kw::BEGIN_MARKER).count();
                out.push_str(block);
            }
        }
        out.push('\n');

        out.push_str("# Manipulator Sounds\n");
        out.push_str(SECTION_BANNER);

        let mut seen_commands = HashSet::new();
        for manip in manipulators {
            if !seen_commands.insert(manip.command.clone()) {
                continue;
            }
            stats.unique_commands += 1;

            let mut entry = SoundEntry::new(ids.next_id());
            entry.comment = manip.tooltip.clone();
            entry.event_name = options.event_name.clone();
            entry.placement = Placement::Xyz(manip.xyz);
            entry.command = manip.command.clone();
            entry.trigger = if options.use_hold_cue {
                TriggerKind::CmndHoldCue
            } else {
                TriggerKind::CmndUp
            };
            out.push_str(&entry.to_snd());
            stats.manipulator_entries += 1;

            if options.duplicate_for_release {
                let mut release = SoundEntry::new(ids.next_id());
                let label = if manip.tooltip.is_empty() {
                    &manip.command
                } else {
                    &manip.tooltip
                };
                release.comment = format!("{label} - Release");
                release.event_name = options.event_name.clone();
                release.placement = Placement::Xyz(manip.xyz);
                release.command = manip.command.clone();
                release.trigger = TriggerKind::CmndUp;
                out.push_str(&release.to_snd());
                stats.manipulator_entries += 1;
            }
        }

        stats.total_entries = stats.canned_blocks + stats.manipulator_entries;
        info!(
            unique_commands = stats.unique_commands,
            canned_blocks = stats.canned_blocks,
            total_entries = stats.total_entries,
            "generated sound bank"
        );
        (out, stats)
    }
}

/// Replace the `/aircraft` root segment of an event path with `/<root>`.
/// Paths not rooted at `/aircraft` pass through unchanged.
pub fn rewrite_root(event_name: &str, root: &str) -> String {
    match event_name.strip_prefix("/aircraft") {
        Some(rest) => format!("/{}{}", root.trim_matches('/'), rest),
        None => event_name.to_string(),
    }
}
