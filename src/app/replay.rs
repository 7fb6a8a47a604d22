//! Aufgezeichnete Pointer-Eingaben (JSON) für den Runner und die Fuzz-Ziele.

use anyhow::{bail, Context};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::PointerEvent;

/// Obergrenze expandierter Frames pro Skript.
pub const MAX_SCRIPT_FRAMES: usize = 100_000;

/// Pointer-ID, unter der `pointer`-Kurzformen als Move gemeldet werden.
pub const PRIMARY_POINTER_ID: u32 = 1;

fn default_frame_dt() -> f32 {
    1.0 / 60.0
}

fn default_repeat() -> u32 {
    1
}

/// Ein Frame des Skripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptFrame {
    /// Events in Auftrittsreihenfolge
    #[serde(default)]
    pub events: Vec<PointerEvent>,
    /// Kurzform für ein Move des primären Pointers nach den Events
    #[serde(default)]
    pub pointer: Option<Vec2>,
    /// Wie oft dieser Frame wiederholt wird (Events nur im ersten)
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ScriptFrame {
    fn events(&self) -> Vec<PointerEvent> {
        let mut events = self.events.clone();
        if let Some(ndc) = self.pointer {
            events.push(PointerEvent::Move {
                pointer_id: PRIMARY_POINTER_ID,
                ndc,
            });
        }
        events
    }
}

/// Pointer-Skript: `{ "frame_dt": .., "frames": [ { "events": [...], "pointer": [x, y] } ] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerScript {
    /// Frame-Zeit in Sekunden
    #[serde(default = "default_frame_dt")]
    pub frame_dt: f32,
    pub frames: Vec<ScriptFrame>,
}

impl PointerScript {
    /// Parst und validiert ein Skript.
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        let script: Self = serde_json::from_str(json).context("Pointer-Skript ist kein gültiges JSON")?;
        script.validate()?;
        Ok(script)
    }

    /// Lädt ein Skript aus einer Datei.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Pointer-Skript nicht lesbar: {}", path.display()))?;
        let script = Self::parse(&content)?;
        log::info!(
            "Pointer-Skript geladen aus: {} ({} Frames)",
            path.display(),
            script.frame_count()
        );
        Ok(script)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.frame_dt.is_finite() || self.frame_dt <= 0.0 {
            bail!("Ungültige Frame-Zeit: {}", self.frame_dt);
        }
        let total = self
            .frames
            .iter()
            .try_fold(0usize, |acc, frame| acc.checked_add(frame.repeat as usize))
            .filter(|&total| total <= MAX_SCRIPT_FRAMES);
        if total.is_none() {
            bail!("Pointer-Skript zu lang (max. {MAX_SCRIPT_FRAMES} Frames)");
        }
        Ok(())
    }

    /// Anzahl der Frames nach Expansion von `repeat`.
    pub fn frame_count(&self) -> usize {
        self.frames.iter().map(|frame| frame.repeat as usize).sum()
    }

    /// Events pro expandiertem Frame.
    pub fn expanded_frames(&self) -> impl Iterator<Item = Vec<PointerEvent>> + '_ {
        self.frames.iter().flat_map(|frame| {
            let first = std::iter::once(frame.events());
            let rest = std::iter::repeat_with(Vec::new).take(frame.repeat.saturating_sub(1) as usize);
            first.take(frame.repeat.min(1) as usize).chain(rest)
        })
    }

    /// Eingebautes Demo-Skript: Karte ruhen lassen, greifen, zur Seite
    /// ziehen, schnappen lassen und ausschwingen.
    pub fn demo() -> Self {
        let mut frames = vec![ScriptFrame {
            events: Vec::new(),
            pointer: None,
            repeat: 180,
        }];
        let start = Vec2::new(0.0, -0.05);
        frames.push(ScriptFrame {
            events: vec![PointerEvent::Down {
                pointer_id: PRIMARY_POINTER_ID,
                ndc: start,
            }],
            pointer: None,
            repeat: 1,
        });
        for i in 1..=20 {
            let t = i as f32 / 20.0;
            frames.push(ScriptFrame {
                events: Vec::new(),
                pointer: Some(start + Vec2::new(0.35 * t, 0.15 * t)),
                repeat: 1,
            });
        }
        frames.push(ScriptFrame {
            events: vec![PointerEvent::Up {
                pointer_id: PRIMARY_POINTER_ID,
                ndc: start + Vec2::new(0.35, 0.15),
            }],
            pointer: None,
            repeat: 240,
        });
        Self {
            frame_dt: default_frame_dt(),
            frames,
        }
    }
}
