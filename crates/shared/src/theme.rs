//! Declarative animation theme and its CSS rendering.
//!
//! The theme is pure data: named animation shorthands plus the keyframe
//! blocks they reference. Markup refers to the generated `.animate-<name>`
//! classes; nothing here is evaluated at runtime.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keyframes the styling framework ships, usable without a local definition.
pub const BUILTIN_KEYFRAMES: &[&str] = &["spin", "ping", "pulse", "bounce"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    #[error("animation '{animation}' has an empty shorthand")]
    EmptyShorthand { animation: String },
    #[error("animation '{animation}' references undefined keyframes '{keyframes}'")]
    UnknownKeyframes {
        animation: String,
        keyframes: String,
    },
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyframeStop {
    /// Offset selector, e.g. `"0%, 100%"`.
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyframes {
    pub name: String,
    pub stops: Vec<KeyframeStop>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    /// CSS `animation` shorthand; its first token names the keyframes.
    pub value: String,
}

impl Animation {
    pub fn keyframes_name(&self) -> Option<&str> {
        self.value.split_whitespace().next()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub animations: Vec<Animation>,
    #[serde(default)]
    pub keyframes: Vec<Keyframes>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            animations: vec![
                animation(
                    "pulse-glow",
                    "pulse 2s cubic-bezier(0.4, 0, 0.6, 1) infinite",
                ),
                animation("float", "float 3s ease-in-out infinite"),
                animation(
                    "gradient-shift",
                    "gradient-shift 8s ease-in-out infinite",
                ),
                animation("fadeIn", "fadeIn 0.3s ease-out"),
            ],
            keyframes: vec![
                Keyframes {
                    name: "float".into(),
                    stops: vec![
                        stop("0%, 100%", &[("transform", "translateY(0px)")]),
                        stop("50%", &[("transform", "translateY(-10px)")]),
                    ],
                },
                Keyframes {
                    name: "gradient-shift".into(),
                    stops: vec![
                        stop("0%, 100%", &[("background-position", "0% 50%")]),
                        stop("50%", &[("background-position", "100% 50%")]),
                    ],
                },
                Keyframes {
                    name: "fadeIn".into(),
                    stops: vec![
                        stop("0%", &[("opacity", "0"), ("transform", "scale(0.9)")]),
                        stop("100%", &[("opacity", "1"), ("transform", "scale(1)")]),
                    ],
                },
            ],
        }
    }
}

impl Theme {
    pub fn keyframes(&self, name: &str) -> Option<&Keyframes> {
        self.keyframes.iter().find(|k| k.name == name)
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        for (idx, kf) in self.keyframes.iter().enumerate() {
            if self.keyframes[..idx].iter().any(|other| other.name == kf.name) {
                return Err(ThemeError::DuplicateName {
                    kind: "keyframes",
                    name: kf.name.clone(),
                });
            }
        }

        for (idx, anim) in self.animations.iter().enumerate() {
            if self.animations[..idx]
                .iter()
                .any(|other| other.name == anim.name)
            {
                return Err(ThemeError::DuplicateName {
                    kind: "animation",
                    name: anim.name.clone(),
                });
            }
            let Some(target) = anim.keyframes_name() else {
                return Err(ThemeError::EmptyShorthand {
                    animation: anim.name.clone(),
                });
            };
            if self.keyframes(target).is_none() && !BUILTIN_KEYFRAMES.contains(&target) {
                return Err(ThemeError::UnknownKeyframes {
                    animation: anim.name.clone(),
                    keyframes: target.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Renders `@keyframes` blocks followed by one `.animate-*` class per animation.
    pub fn render_css(&self) -> Result<String, ThemeError> {
        self.validate()?;

        let keyframes = self.keyframes.iter().map(|kf| {
            let stops: String = kf
                .stops
                .iter()
                .map(|stop| {
                    let declarations: String = stop
                        .declarations
                        .iter()
                        .map(|decl| format!("    {}: {};\n", decl.property, decl.value))
                        .collect();
                    format!("  {} {{\n{declarations}  }}\n", stop.selector)
                })
                .collect();
            format!("@keyframes {} {{\n{stops}}}\n\n", kf.name)
        });
        let classes = self
            .animations
            .iter()
            .map(|anim| format!(".animate-{} {{\n  animation: {};\n}}\n\n", anim.name, anim.value));

        let css: String = keyframes.chain(classes).collect();
        Ok(css)
    }

    /// The `theme.extend` object in the shape the styling framework's config expects.
    pub fn to_framework_config(&self) -> serde_json::Value {
        let animation: serde_json::Map<String, serde_json::Value> = self
            .animations
            .iter()
            .map(|a| (a.name.clone(), serde_json::Value::String(a.value.clone())))
            .collect();
        let keyframes: serde_json::Map<String, serde_json::Value> = self
            .keyframes
            .iter()
            .map(|kf| {
                let stops: serde_json::Map<String, serde_json::Value> = kf
                    .stops
                    .iter()
                    .map(|stop| {
                        let decls: serde_json::Map<String, serde_json::Value> = stop
                            .declarations
                            .iter()
                            .map(|d| (d.property.clone(), serde_json::Value::String(d.value.clone())))
                            .collect();
                        (stop.selector.clone(), serde_json::Value::Object(decls))
                    })
                    .collect();
                (kf.name.clone(), serde_json::Value::Object(stops))
            })
            .collect();

        serde_json::json!({
            "theme": {
                "extend": {
                    "animation": animation,
                    "keyframes": keyframes,
                }
            }
        })
    }
}

fn animation(name: &str, value: &str) -> Animation {
    Animation {
        name: name.into(),
        value: value.into(),
    }
}

fn stop(selector: &str, declarations: &[(&str, &str)]) -> KeyframeStop {
    KeyframeStop {
        selector: selector.into(),
        declarations: declarations
            .iter()
            .map(|(property, value)| Declaration {
                property: (*property).into(),
                value: (*value).into(),
            })
            .collect(),
    }
}

#[cfg(test)]
#[path = "tests/theme_tests.rs"]
mod tests;
