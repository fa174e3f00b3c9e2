use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use roxmltree::{Document, Node};
use tracing::info;

use crate::app::Vec2;
use crate::playback::{CommandToken, PlaybackTuning, ScriptedSequencer};

use super::level::{
    default_adversary_tuning, ActorSpawnDef, LevelDef, DEFAULT_CAMERA_SIZE, DEFAULT_FLOOR_Y,
    DEFAULT_MAX_INPUTS_PER_TURN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentErrorCode {
    ReadFile,
    XmlMalformed,
    InvalidRoot,
    UnknownElement,
    UnknownAttribute,
    DuplicateElement,
    MissingField,
    InvalidValue,
    DuplicateTurn,
}

#[derive(Debug, Clone)]
pub struct LevelLoadError {
    pub code: ContentErrorCode,
    pub message: String,
    pub file_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (file={}, line={}, column={})",
                self.code,
                self.message,
                self.file_path.display(),
                loc.line,
                loc.column
            ),
            None => write!(
                f,
                "{:?}: {} (file={})",
                self.code,
                self.message,
                self.file_path.display()
            ),
        }
    }
}

impl std::error::Error for LevelLoadError {}

pub fn load_level(file_path: &Path) -> Result<LevelDef, LevelLoadError> {
    let raw = fs::read_to_string(file_path).map_err(|source| LevelLoadError {
        code: ContentErrorCode::ReadFile,
        message: format!("failed to read level file: {source}"),
        file_path: file_path.to_path_buf(),
        location: None,
    })?;
    let level = parse_level(file_path, &raw)?;
    info!(
        level = level.name.as_str(),
        file = %file_path.display(),
        scripted_turns = level.script.scripted_turns(),
        "level_loaded"
    );
    Ok(level)
}

/// `file_path` is only used for error reporting.
pub fn parse_level(file_path: &Path, raw: &str) -> Result<LevelDef, LevelLoadError> {
    let doc = Document::parse(raw).map_err(|error| LevelLoadError {
        code: ContentErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;
    let ctx = ParseContext {
        file_path,
        doc: &doc,
    };

    let root = doc.root_element();
    if root.tag_name().name() != "Level" {
        return Err(ctx.error_at(
            ContentErrorCode::InvalidRoot,
            "root element must be <Level>".to_string(),
            root,
        ));
    }
    ctx.check_attributes(root, &["name", "cameraSize", "floorY"])?;

    let mut level = LevelDef {
        name: ctx.required_attr(root, "name")?,
        camera_size: ctx.positive_f32_attr(root, "cameraSize")?.unwrap_or(DEFAULT_CAMERA_SIZE),
        floor_y: ctx.f32_attr(root, "floorY")?.unwrap_or(DEFAULT_FLOOR_Y),
        ..LevelDef::default()
    };

    let mut seen = HashSet::<&str>::new();
    let mut player = None;
    let mut adversary = None;
    for child in root.children().filter(|node| node.is_element()) {
        let tag = child.tag_name().name();
        if !seen.insert(tag) {
            return Err(ctx.error_at(
                ContentErrorCode::DuplicateElement,
                format!("<{tag}> may appear only once in <Level>"),
                child,
            ));
        }
        match tag {
            "Player" => player = Some(parse_player(&ctx, child)?),
            "Adversary" => adversary = Some(parse_adversary(&ctx, child)?),
            _ => {
                return Err(ctx.error_at(
                    ContentErrorCode::UnknownElement,
                    format!("unknown element <{tag}> in <Level>; expected <Player> or <Adversary>"),
                    child,
                ))
            }
        }
    }

    let Some((player, max_inputs_per_turn)) = player else {
        return Err(ctx.error_at(
            ContentErrorCode::MissingField,
            "missing required element <Player> in <Level>".to_string(),
            root,
        ));
    };
    let Some((adversary, script)) = adversary else {
        return Err(ctx.error_at(
            ContentErrorCode::MissingField,
            "missing required element <Adversary> in <Level>".to_string(),
            root,
        ));
    };

    level.player = player;
    level.max_inputs_per_turn = max_inputs_per_turn;
    level.adversary = adversary;
    level.script = script;
    Ok(level)
}

fn parse_player(
    ctx: &ParseContext<'_, '_>,
    node: Node<'_, '_>,
) -> Result<(ActorSpawnDef, Option<usize>), LevelLoadError> {
    ctx.check_attributes(node, &["x", "y", "maxInputsPerTurn"])?;
    let position = ctx.position(node)?;
    // Zero means no cap.
    let max_inputs = match ctx.attr(node, "maxInputsPerTurn") {
        None => Some(DEFAULT_MAX_INPUTS_PER_TURN),
        Some(value) => {
            let parsed = value.trim().parse::<usize>().map_err(|_| {
                ctx.error_at(
                    ContentErrorCode::InvalidValue,
                    format!("maxInputsPerTurn '{value}' is not a non-negative integer"),
                    node,
                )
            })?;
            (parsed > 0).then_some(parsed)
        }
    };

    let mut tuning = PlaybackTuning::default();
    for child in node.children().filter(|child| child.is_element()) {
        match child.tag_name().name() {
            "Tuning" => tuning = parse_tuning(ctx, child, tuning)?,
            other => {
                return Err(ctx.error_at(
                    ContentErrorCode::UnknownElement,
                    format!("unknown element <{other}> in <Player>; expected <Tuning>"),
                    child,
                ))
            }
        }
    }

    Ok((ActorSpawnDef { position, tuning }, max_inputs))
}

fn parse_adversary(
    ctx: &ParseContext<'_, '_>,
    node: Node<'_, '_>,
) -> Result<(ActorSpawnDef, ScriptedSequencer), LevelLoadError> {
    ctx.check_attributes(node, &["x", "y"])?;
    let position = ctx.position(node)?;

    let mut tuning = default_adversary_tuning();
    let mut script = None;
    for child in node.children().filter(|child| child.is_element()) {
        match child.tag_name().name() {
            "Tuning" => tuning = parse_tuning(ctx, child, tuning)?,
            "Script" => script = Some(parse_script(ctx, child)?),
            other => {
                return Err(ctx.error_at(
                    ContentErrorCode::UnknownElement,
                    format!("unknown element <{other}> in <Adversary>; expected <Tuning> or <Script>"),
                    child,
                ))
            }
        }
    }

    Ok((
        ActorSpawnDef { position, tuning },
        script.unwrap_or_else(ScriptedSequencer::empty),
    ))
}

const TUNING_ATTRIBUTES: [&str; 9] = [
    "moveDuration",
    "moveSpeedScale",
    "jumpForce",
    "horizontalForce",
    "jumpDrift",
    "groundPollInterval",
    "settleDuration",
    "stallReportAfter",
    "groundWaitTimeout",
];

/// Attributes override `base`; absent ones keep it.
fn parse_tuning(
    ctx: &ParseContext<'_, '_>,
    node: Node<'_, '_>,
    base: PlaybackTuning,
) -> Result<PlaybackTuning, LevelLoadError> {
    ctx.check_attributes(node, &TUNING_ATTRIBUTES)?;
    let mut tuning = base;

    if let Some(value) = ctx.non_negative_f32_attr(node, "moveDuration")? {
        tuning.move_duration = value;
    }
    if let Some(value) = ctx.positive_f32_attr(node, "moveSpeedScale")? {
        tuning.move_speed_scale = value;
    }
    if let Some(value) = ctx.f32_attr(node, "jumpForce")? {
        tuning.jump_force = value;
    }
    if let Some(value) = ctx.f32_attr(node, "horizontalForce")? {
        tuning.horizontal_force = value;
    }
    if let Some(value) = ctx.f32_attr(node, "jumpDrift")? {
        tuning.jump_drift = value;
    }
    if let Some(value) = ctx.positive_f32_attr(node, "groundPollInterval")? {
        tuning.ground_poll_interval = value;
    }
    if let Some(value) = ctx.non_negative_f32_attr(node, "settleDuration")? {
        tuning.settle_duration = value;
    }
    if let Some(value) = ctx.non_negative_f32_attr(node, "stallReportAfter")? {
        tuning.stall_report_after = value;
    }
    match ctx.attr(node, "groundWaitTimeout") {
        Some(value) if value.trim().eq_ignore_ascii_case("none") => {
            tuning.ground_wait_timeout = None;
        }
        Some(_) => {
            tuning.ground_wait_timeout = ctx.positive_f32_attr(node, "groundWaitTimeout")?;
        }
        None => {}
    }

    Ok(tuning)
}

fn parse_script(
    ctx: &ParseContext<'_, '_>,
    node: Node<'_, '_>,
) -> Result<ScriptedSequencer, LevelLoadError> {
    let mut script = ScriptedSequencer::empty();
    for turn_node in node.children().filter(|child| child.is_element()) {
        if turn_node.tag_name().name() != "Turn" {
            return Err(ctx.error_at(
                ContentErrorCode::UnknownElement,
                format!(
                    "unknown element <{}> in <Script>; expected <Turn>",
                    turn_node.tag_name().name()
                ),
                turn_node,
            ));
        }
        ctx.check_attributes(turn_node, &["index"])?;
        let raw_index = ctx.required_attr(turn_node, "index")?;
        let index = raw_index
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|index| *index >= 1)
            .ok_or_else(|| {
                ctx.error_at(
                    ContentErrorCode::InvalidValue,
                    format!("turn index '{raw_index}' must be an integer >= 1"),
                    turn_node,
                )
            })?;

        let mut plan = Vec::new();
        for command in turn_node.children().filter(|child| child.is_element()) {
            if command.tag_name().name() != "Command" {
                return Err(ctx.error_at(
                    ContentErrorCode::UnknownElement,
                    format!(
                        "unknown element <{}> in <Turn>; expected <Command>",
                        command.tag_name().name()
                    ),
                    command,
                ));
            }
            let text = ctx.required_text(command, "Command")?;
            let token = CommandToken::from_str(&text).map_err(|error| {
                ctx.error_at(ContentErrorCode::InvalidValue, error.to_string(), command)
            })?;
            plan.push(token);
        }

        if script.insert_turn(index, plan).is_some() {
            return Err(ctx.error_at(
                ContentErrorCode::DuplicateTurn,
                format!("turn {index} is scripted more than once"),
                turn_node,
            ));
        }
    }
    Ok(script)
}

struct ParseContext<'a, 'input> {
    file_path: &'a Path,
    doc: &'a Document<'input>,
}

impl ParseContext<'_, '_> {
    fn error_at(&self, code: ContentErrorCode, message: String, node: Node<'_, '_>) -> LevelLoadError {
        let pos = self.doc.text_pos_at(node.range().start);
        LevelLoadError {
            code,
            message,
            file_path: self.file_path.to_path_buf(),
            location: Some(SourceLocation {
                line: pos.row as usize,
                column: pos.col as usize,
            }),
        }
    }

    fn check_attributes(&self, node: Node<'_, '_>, allowed: &[&str]) -> Result<(), LevelLoadError> {
        match node
            .attributes()
            .find(|attribute| !allowed.contains(&attribute.name()))
        {
            Some(attribute) => Err(self.error_at(
                ContentErrorCode::UnknownAttribute,
                format!(
                    "unknown attribute '{}' on <{}>; allowed: {}",
                    attribute.name(),
                    node.tag_name().name(),
                    allowed.join(", ")
                ),
                node,
            )),
            None => Ok(()),
        }
    }

    fn attr<'n>(&self, node: Node<'n, '_>, name: &str) -> Option<&'n str> {
        node.attribute(name)
    }

    fn required_attr(&self, node: Node<'_, '_>, name: &str) -> Result<String, LevelLoadError> {
        let value = node.attribute(name).map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(self.error_at(
                ContentErrorCode::MissingField,
                format!(
                    "missing required attribute '{name}' on <{}>",
                    node.tag_name().name()
                ),
                node,
            ));
        }
        Ok(value.to_string())
    }

    fn required_text(&self, node: Node<'_, '_>, element: &str) -> Result<String, LevelLoadError> {
        let value = node.text().map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(self.error_at(
                ContentErrorCode::MissingField,
                format!("element <{element}> must not be empty"),
                node,
            ));
        }
        Ok(value.to_string())
    }

    fn f32_attr(&self, node: Node<'_, '_>, name: &str) -> Result<Option<f32>, LevelLoadError> {
        let Some(value) = node.attribute(name) else {
            return Ok(None);
        };
        match value.trim().parse::<f32>() {
            Ok(parsed) if parsed.is_finite() => Ok(Some(parsed)),
            _ => Err(self.error_at(
                ContentErrorCode::InvalidValue,
                format!("{name} '{value}' is not a finite number"),
                node,
            )),
        }
    }

    fn non_negative_f32_attr(
        &self,
        node: Node<'_, '_>,
        name: &str,
    ) -> Result<Option<f32>, LevelLoadError> {
        match self.f32_attr(node, name)? {
            Some(value) if value < 0.0 => Err(self.error_at(
                ContentErrorCode::InvalidValue,
                format!("{name} must be >= 0"),
                node,
            )),
            other => Ok(other),
        }
    }

    fn positive_f32_attr(
        &self,
        node: Node<'_, '_>,
        name: &str,
    ) -> Result<Option<f32>, LevelLoadError> {
        match self.f32_attr(node, name)? {
            Some(value) if value <= 0.0 => Err(self.error_at(
                ContentErrorCode::InvalidValue,
                format!("{name} must be > 0"),
                node,
            )),
            other => Ok(other),
        }
    }

    fn position(&self, node: Node<'_, '_>) -> Result<Vec2, LevelLoadError> {
        let Some(x) = self.f32_attr(node, "x")? else {
            return Err(self.error_at(
                ContentErrorCode::MissingField,
                format!("missing required attribute 'x' on <{}>", node.tag_name().name()),
                node,
            ));
        };
        let y = self.f32_attr(node, "y")?.unwrap_or(DEFAULT_FLOOR_Y + 0.5);
        Ok(Vec2::new(x, y))
    }
}
