pub mod config;
pub mod kb;
pub mod suggest;

use std::io::Read;
use std::path::Path;

use northstar_core::schedule::parse_wall_clock;
use northstar_core::SchedulerInput;

/// Read a scheduling snapshot from a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path, now: Option<&str>) -> Result<SchedulerInput, Box<dyn std::error::Error>> {
    let json = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?
    };

    let mut input = SchedulerInput::from_json(&json)?;
    if let Some(now) = now {
        input.now = Some(parse_wall_clock(now)?);
    }
    tracing::debug!(
        tasks = input.tasks.len(),
        goals = input.goals.len(),
        now = ?input.now,
        "loaded snapshot"
    );
    Ok(input)
}
