use super::plan::{ActuatorSchedule, MissionPlan, Waypoint};
use crate::common::{DomainError, DomainResult};
use crate::domains::logger::DynLogger;

const COMMENT_MARKER: char = ';';
const FIELDS_PER_LINE: usize = 5;

/// Parses print-path text into a mission plan and its actuator schedule.
///
/// One instruction per line, five whitespace-separated numeric fields
/// `x y z speed extrude_flag` (nonzero flag = extruding). Lines containing
/// the comment marker are skipped entirely, as are blank lines. Parsing
/// aborts on the first malformed line; input with no data lines is rejected,
/// so a returned plan is never empty.
pub fn parse_print_path(
    text: &str,
    logger: &DynLogger,
) -> DomainResult<(MissionPlan, ActuatorSchedule)> {
    let mut waypoints = Vec::new();
    let mut extrude_states = Vec::new();

    for (number, raw) in text.lines().enumerate() {
        let number = number + 1;
        // ignore comments
        if raw.contains(COMMENT_MARKER) {
            continue;
        }
        let line = raw.trim().to_ascii_lowercase();
        // ignore null lines
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != FIELDS_PER_LINE {
            return Err(DomainError::Parse {
                line: number,
                reason: format!(
                    "expected {} fields, found {}",
                    FIELDS_PER_LINE,
                    fields.len()
                ),
            });
        }

        let mut values = [0.0f64; FIELDS_PER_LINE];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field.parse().map_err(|_| DomainError::Parse {
                line: number,
                reason: format!("not a number: '{}'", field),
            })?;
        }

        waypoints.push(Waypoint {
            x: values[0],
            y: values[1],
            z: values[2],
            speed: values[3],
        });
        extrude_states.push(values[4] != 0.0);
        logger.info(&format!(
            "Added waypoint X={}, Y={}, Z={}, SPD={}, EXT={}",
            values[0], values[1], values[2], values[3], values[4]
        ));
    }

    if waypoints.is_empty() {
        return Err(DomainError::EmptyMission);
    }

    Ok((MissionPlan::new(waypoints), ActuatorSchedule::new(extrude_states)))
}
