//! OBJ8 geometry extraction
//!
//! Best-effort line scanner for X-Plane object files: collects the vertex
//! table (`VT` records) and every manipulator declaration, binding each
//! manipulator to the vertex selected by the most recent `TRIS` marker.
//! Malformed lines are skipped, never fatal; callers observe degradation
//! through the vertex/manipulator counts.

use anyhow::{bail, Result};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::constants::obj::{MANIP_NONE, MANIP_PREFIX, TRIS_TAG, VERTEX_TAG};

/// A point in aircraft coordinates (meters, X-Plane axes)
pub type Xyz = [f64; 3];

/// One interactive-control declaration from the object file
#[derive(Debug, Clone, PartialEq)]
pub struct Manipulator {
    /// Interaction category with the `ATTR_manip_` prefix stripped
    /// (e.g. "command", "drag_axis", "axis_knob")
    pub kind: String,
    /// Cursor hint shown when hovering the manipulator
    pub cursor: String,
    /// Command identifier; the join key for .snd matching
    pub command: String,
    /// Free-text label
    pub tooltip: String,
    /// Resolved anchor position from the vertex table
    pub xyz: Xyz,
    /// 1-based source line of the declaration
    pub line_number: usize,
}

/// Parsed geometry: vertex table plus position-resolved manipulators
#[derive(Debug, Default)]
pub struct ObjGeometry {
    pub vertices: Vec<Xyz>,
    pub manipulators: Vec<Manipulator>,
}

impl ObjGeometry {
    /// Two-pass scan over the object source. Pass 1 builds the vertex
    /// table; pass 2 walks the draw directives, tracking the current
    /// vertex offset set by `TRIS` markers and anchoring each manipulator
    /// declaration to `vertices[offset]`. Manipulators whose offset falls
    /// outside the table are dropped (no position to anchor to).
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            bail!("no geometry supplied: OBJ buffer is empty");
        }

        let lines: Vec<&str> = content.lines().collect();
        let mut geometry = ObjGeometry::default();

        for line in &lines {
            // VT records are tab- or space-delimited depending on exporter
            if line.starts_with("VT\t") || line.starts_with("VT ") {
                match parse_vertex(line) {
                    Some(xyz) => geometry.vertices.push(xyz),
                    None => debug!(line = *line, "skipping malformed VT record"),
                }
            }
        }

        let mut current_vertex_offset = 0usize;

        for (i, raw) in lines.iter().enumerate() {
            let line = raw.trim();

            if line.starts_with(TRIS_TAG) {
                let mut tokens = line.split_whitespace();
                tokens.next();
                current_vertex_offset = tokens
                    .next()
                    .and_then(|t| t.parse::<usize>().ok())
                    .unwrap_or(0);
            }

            if line.contains(MANIP_PREFIX) && !line.contains(MANIP_NONE) {
                if let Some(mut manip) = parse_manipulator(line, i + 1) {
                    if current_vertex_offset < geometry.vertices.len() {
                        manip.xyz = geometry.vertices[current_vertex_offset];
                        geometry.manipulators.push(manip);
                    } else {
                        debug!(
                            line_number = i + 1,
                            offset = current_vertex_offset,
                            vertices = geometry.vertices.len(),
                            "dropping manipulator with out-of-range vertex offset"
                        );
                    }
                }
            }
        }

        info!(
            vertices = geometry.vertices.len(),
            manipulators = geometry.manipulators.len(),
            "parsed OBJ geometry"
        );
        Ok(geometry)
    }

    /// Command → position map used by both update matching and generation
    /// dedup. First occurrence in scan order wins; later duplicates stay in
    /// `manipulators` but never override the mapped position.
    pub fn command_map(&self) -> HashMap<String, Xyz> {
        let mut map = HashMap::new();
        for manip in &self.manipulators {
            if !manip.command.is_empty() && !map.contains_key(&manip.command) {
                map.insert(manip.command.clone(), manip.xyz);
            }
        }
        map
    }

    /// Drop manipulators whose kind is listed in `excluded`. Returns the
    /// number removed so callers can surface the count.
    pub fn filter_kinds(&mut self, excluded: &[String]) -> usize {
        let before = self.manipulators.len();
        self.manipulators
            .retain(|m| !excluded.iter().any(|k| k == &m.kind));
        let dropped = before - self.manipulators.len();
        if dropped > 0 {
            info!(dropped, "filtered manipulators by kind");
        }
        dropped
    }
}

fn parse_vertex(line: &str) -> Option<Xyz> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 || parts[0] != VERTEX_TAG {
        return None;
    }
    let x = parts[1].parse().ok()?;
    let y = parts[2].parse().ok()?;
    let z = parts[3].parse().ok()?;
    Some([x, y, z])
}

/// Manipulator declarations are tab-separated: kind, cursor, command,
/// tooltip. Anything after the tooltip is exporter noise and ignored.
fn parse_manipulator(line: &str, line_number: usize) -> Option<Manipulator> {
    let parts: Vec<&str> = line
        .split('\t')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() < 3 {
        return None;
    }

    let kind = parts[0].strip_prefix(MANIP_PREFIX).unwrap_or(parts[0]);

    Some(Manipulator {
        kind: kind.to_string(),
        cursor: parts[1].to_string(),
        command: parts[2].to_string(),
        tooltip: parts.get(3).copied().unwrap_or("").to_string(),
        xyz: [0.0, 0.0, 0.0],
        line_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_obj() -> String {
        [
            "A",
            "800",
            "OBJ",
            "",
            "VT\t0.000\t0.000\t0.000\t0.0\t1.0\t0.0\t0.0\t0.0",
            "VT\t1.000\t2.000\t3.000\t0.0\t1.0\t0.0\t0.5\t0.5",
            "VT\t-4.500\t0.250\t9.000\t0.0\t1.0\t0.0\t1.0\t1.0",
            "",
            "TRIS 1 3",
            "ATTR_manip_command\thand\tsim/cockpit/battery_toggle\tBattery",
            "TRIS 2 3",
            "ATTR_manip_command\thand\tsim/lights/landing_toggle\tLanding lights",
        ]
        .join("\n")
    }

    #[test]
    fn test_parse_collects_vertices() {
        let geometry = ObjGeometry::parse(&sample_obj()).unwrap();
        assert_eq!(geometry.vertices.len(), 3);
        assert_eq!(geometry.vertices[1], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_malformed_vertex_skipped() {
        let obj = "VT\t1.0\t2.0\t3.0\nVT\tfoo\t2.0\t3.0\nVT 4.0 5.0 6.0";
        let geometry = ObjGeometry::parse(obj).unwrap();
        assert_eq!(geometry.vertices.len(), 2);
        assert_eq!(geometry.vertices[1], [4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_manipulator_bound_to_tris_offset() {
        let geometry = ObjGeometry::parse(&sample_obj()).unwrap();
        assert_eq!(geometry.manipulators.len(), 2);
        assert_eq!(geometry.manipulators[0].command, "sim/cockpit/battery_toggle");
        assert_eq!(geometry.manipulators[0].xyz, [1.0, 2.0, 3.0]);
        assert_eq!(geometry.manipulators[1].xyz, [-4.5, 0.25, 9.0]);
    }

    #[test]
    fn test_manipulator_fields() {
        let geometry = ObjGeometry::parse(&sample_obj()).unwrap();
        let manip = &geometry.manipulators[0];
        assert_eq!(manip.kind, "command");
        assert_eq!(manip.cursor, "hand");
        assert_eq!(manip.tooltip, "Battery");
        assert_eq!(manip.line_number, 10);
    }

    #[test]
    fn test_out_of_range_offset_drops_manipulator() {
        let obj = [
            "VT\t0.000\t0.000\t0.000",
            "TRIS 5 3",
            "ATTR_manip_command\thand\tsim/cmd/lost\tGone",
            "TRIS 0 3",
            "ATTR_manip_command\thand\tsim/cmd/kept\tStays",
        ]
        .join("\n");
        let geometry = ObjGeometry::parse(&obj).unwrap();
        assert_eq!(geometry.manipulators.len(), 1);
        assert_eq!(geometry.manipulators[0].command, "sim/cmd/kept");
    }

    #[test]
    fn test_manip_none_ignored() {
        let obj = "VT\t0.0\t0.0\t0.0\nATTR_manip_none\nATTR_manip_command\thand\tsim/x\tX";
        let geometry = ObjGeometry::parse(obj).unwrap();
        assert_eq!(geometry.manipulators.len(), 1);
    }

    #[test]
    fn test_invalid_tris_offset_resets_to_zero() {
        let obj = [
            "VT\t7.000\t8.000\t9.000",
            "VT\t1.000\t1.000\t1.000",
            "TRIS garbage",
            "ATTR_manip_command\thand\tsim/cmd/a\tA",
        ]
        .join("\n");
        let geometry = ObjGeometry::parse(&obj).unwrap();
        assert_eq!(geometry.manipulators[0].xyz, [7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_command_map_first_occurrence_wins() {
        let obj = [
            "VT\t0.000\t0.000\t0.000",
            "VT\t5.000\t5.000\t5.000",
            "TRIS 0 3",
            "ATTR_manip_command\thand\tsim/cmd/dup\tFirst",
            "TRIS 1 3",
            "ATTR_manip_command\thand\tsim/cmd/dup\tSecond",
        ]
        .join("\n");
        let geometry = ObjGeometry::parse(&obj).unwrap();
        assert_eq!(geometry.manipulators.len(), 2);

        let map = geometry.command_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map["sim/cmd/dup"], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(ObjGeometry::parse("").is_err());
        assert!(ObjGeometry::parse("  \n\t\n").is_err());
    }

    #[test]
    fn test_filter_kinds() {
        let obj = [
            "VT\t0.000\t0.000\t0.000",
            "TRIS 0 3",
            "ATTR_manip_command\thand\tsim/cmd/a\tA",
            "ATTR_manip_noop\thand\tsim/cmd/b\tB",
            "ATTR_manip_drag_axis\thand\tsim/cmd/c\tC",
        ]
        .join("\n");
        let mut geometry = ObjGeometry::parse(&obj).unwrap();
        let dropped = geometry.filter_kinds(&["noop".to_string(), "drag_axis".to_string()]);
        assert_eq!(dropped, 2);
        assert_eq!(geometry.manipulators.len(), 1);
        assert_eq!(geometry.manipulators[0].kind, "command");
    }
}
