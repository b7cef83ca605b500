/// Maximum number of entries kept by the console log.
pub const LOG_CAPACITY: usize = 16;

/// Entries the log holds at session start and after every reset.
pub const BOOTSTRAP_LINES: [&str; 2] = ["engine initialized", "scene loaded, awaiting command"];

/// Message fragments that mark a console entry as an alert.
pub const ALERT_KEYWORDS: &[&str] = &["conflict", "warning"];

/// One instruction of a narration script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLine {
    Emit(&'static str),
    /// Suspend the script for the given number of milliseconds.
    Wait(u64),
}

const PERCEPTION: &[ScriptLine] = &[
    ScriptLine::Emit("scanning CIM demand signals"),
    ScriptLine::Wait(600),
    ScriptLine::Emit("target unit located"),
];

const MODELING: &[ScriptLine] = &[
    ScriptLine::Emit("invoking BIM component parser"),
    ScriptLine::Wait(800),
    ScriptLine::Emit("LOD 400 component generated"),
];

const CONFLICT_SIMULATION: &[ScriptLine] = &[
    ScriptLine::Emit("running full-scene conflict check"),
    ScriptLine::Wait(1000),
    ScriptLine::Emit("critical hard conflict: gas pipeline"),
    ScriptLine::Emit("autonomous correction: coordinate offset compensation"),
];

const VALUE_REALIZATION: &[ScriptLine] = &[
    ScriptLine::Emit("generating digital delivery report"),
    ScriptLine::Wait(600),
    ScriptLine::Emit("asset registered"),
];

/// Script played while transitioning into `target_step`. `None` outside 1..=4.
pub fn script_for(target_step: u8) -> Option<&'static [ScriptLine]> {
    match target_step {
        1 => Some(PERCEPTION),
        2 => Some(MODELING),
        3 => Some(CONFLICT_SIMULATION),
        4 => Some(VALUE_REALIZATION),
        _ => None,
    }
}

/// Messages a script emits, in order, ignoring waits.
pub fn script_messages(target_step: u8) -> Vec<&'static str> {
    script_for(target_step)
        .unwrap_or_default()
        .iter()
        .filter_map(|line| match line {
            ScriptLine::Emit(message) => Some(*message),
            ScriptLine::Wait(_) => None,
        })
        .collect()
}
