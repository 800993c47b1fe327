use std::{fs, path::Path};

use json::{self, JsonValue};

use crate::{Error, InputIntent, ScriptedInput, Settings};

pub const DEFAULT_MAX_TICKS: usize = 10_000;

/// A settings file plus the intents to replay against it.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub settings: Settings,
    pub inputs: ScriptedInput,
    pub max_ticks: usize,
}

macro_rules! override_from {
    ($json:ident, $target:expr, $($section:literal / $key:literal => $builder:ident),+ $(,)?) => {{
        let mut target = $target;
        $(
            if let Some(value) = optional_number(&$json, $section, $key)? {
                target = target.$builder(value);
            }
        )+
        target
    }};
}

pub fn parse_settings<P: AsRef<Path>>(settings_file_path: P) -> Result<Settings, Error> {
    settings_from_json(&read_json(settings_file_path)?)
}

pub fn parse_settings_str(content: &str) -> Result<Settings, Error> {
    settings_from_json(&json::parse(content)?)
}

pub fn parse_scenario<P: AsRef<Path>>(scenario_file_path: P) -> Result<Scenario, Error> {
    scenario_from_json(&read_json(scenario_file_path)?)
}

pub fn parse_scenario_str(content: &str) -> Result<Scenario, Error> {
    scenario_from_json(&json::parse(content)?)
}

fn read_json<P: AsRef<Path>>(file_path: P) -> Result<JsonValue, Error> {
    let path = file_path.as_ref();
    let file_content = fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(json::parse(&file_content)?)
}

fn settings_from_json(json: &JsonValue) -> Result<Settings, Error> {
    let defaults = Settings::default();

    let terrain = override_from!(json, defaults.terrain,
        "World" / "Width" => with_world_width,
        "World" / "Step" => with_step,
    );
    let lander = override_from!(json, defaults.lander,
        "Lander" / "X" => with_x,
        "Lander" / "Y" => with_y,
        "Lander" / "HSpeed" => with_vx,
        "Lander" / "VSpeed" => with_vy,
        "Lander" / "Fuel" => with_fuel,
        "Lander" / "Width" => with_width,
        "Lander" / "Height" => with_height,
    );
    let physics = override_from!(json, defaults.physics,
        "Physics" / "Gravity" => with_g,
        "Physics" / "ThrustPower" => with_thrust_power,
        "Physics" / "LateralFactor" => with_lateral_factor,
        "Physics" / "VerticalFuelCost" => with_vertical_fuel_cost,
        "Physics" / "LateralFuelCost" => with_lateral_fuel_cost,
        "Physics" / "Damping" => with_damping,
    );
    let limits = override_from!(json, defaults.limits,
        "Limits" / "SoftSpeed" => with_soft_speed,
        "Limits" / "StableSpeed" => with_stable_speed,
        "Limits" / "FuelReserve" => with_fuel_reserve,
        "Limits" / "SurvivableSpeed" => with_survivable_speed,
    );
    let floor_y = optional_number(json, "World", "FloorY")?.unwrap_or(defaults.floor_y);

    let seed = &json["Seed"];
    let seed = if seed.is_null() {
        None
    } else {
        Some(seed.as_u64().ok_or(Error::InvalidValue {
            key: "Seed".to_owned(),
            expected: "non-negative integer",
        })?)
    };

    let history_limit = &json["HistoryLimit"];
    let history_limit = if history_limit.is_null() {
        None
    } else {
        Some(history_limit.as_usize().ok_or(Error::InvalidValue {
            key: "HistoryLimit".to_owned(),
            expected: "non-negative integer",
        })?)
    };

    Ok(Settings {
        terrain,
        lander,
        physics,
        limits,
        floor_y,
        seed,
        history_limit,
    })
}

fn scenario_from_json(json: &JsonValue) -> Result<Scenario, Error> {
    let max_ticks = &json["MaxTicks"];
    let max_ticks = if max_ticks.is_null() {
        DEFAULT_MAX_TICKS
    } else {
        max_ticks.as_usize().ok_or(Error::InvalidValue {
            key: "MaxTicks".to_owned(),
            expected: "non-negative integer",
        })?
    };

    Ok(Scenario {
        settings: settings_from_json(json)?,
        inputs: parse_inputs(&json["Inputs"], max_ticks)?,
        max_ticks,
    })
}

// Each entry is either `[up, left, right]` for a single tick or
// `{"Up": .., "Left": .., "Right": .., "Ticks": n}` held for n ticks.
// The script may not outlast `max_ticks`.
fn parse_inputs(inputs: &JsonValue, max_ticks: usize) -> Result<ScriptedInput, Error> {
    if inputs.is_null() {
        return Ok(ScriptedInput::default());
    }
    if !inputs.is_array() {
        return Err(Error::InvalidValue {
            key: "Inputs".to_owned(),
            expected: "array",
        });
    }

    let mut intents = Vec::new();
    for (id, entry) in inputs.members().enumerate() {
        if entry.is_array() {
            let flags = entry
                .members()
                .map(|flag| parse_flag(flag, id))
                .collect::<Result<Vec<_>, Error>>()?;
            match flags[..] {
                [_, _, _] if intents.len() >= max_ticks => {
                    return Err(Error::InvalidValue {
                        key: format!("Inputs/{id}"),
                        expected: "entry within MaxTicks",
                    })
                }
                [up, left, right] => intents.push(InputIntent::new(up, left, right)),
                _ => {
                    return Err(Error::InvalidValue {
                        key: format!("Inputs/{id}"),
                        expected: "[up, left, right] triple",
                    })
                }
            }
        } else if entry.is_object() {
            let flag = |key: &str| {
                let value = &entry[key];
                if value.is_null() {
                    Ok(false)
                } else {
                    parse_flag(value, id)
                }
            };
            let intent = InputIntent::new(flag("Up")?, flag("Left")?, flag("Right")?);
            let ticks = &entry["Ticks"];
            let ticks = if ticks.is_null() {
                1
            } else {
                ticks.as_usize().ok_or(Error::InvalidValue {
                    key: format!("Inputs/{id}/Ticks"),
                    expected: "non-negative integer",
                })?
            };
            if ticks > max_ticks.saturating_sub(intents.len()) {
                return Err(Error::InvalidValue {
                    key: format!("Inputs/{id}/Ticks"),
                    expected: "tick count keeping the script within MaxTicks",
                });
            }
            intents.extend(std::iter::repeat(intent).take(ticks));
        } else {
            return Err(Error::InvalidValue {
                key: format!("Inputs/{id}"),
                expected: "array or object",
            });
        }
    }
    Ok(ScriptedInput::new(intents))
}

fn parse_flag(value: &JsonValue, id: usize) -> Result<bool, Error> {
    value
        .as_bool()
        .or_else(|| value.as_u8().filter(|v| *v <= 1).map(|v| v == 1))
        .ok_or(Error::InvalidValue {
            key: format!("Inputs/{id}"),
            expected: "boolean or 0/1",
        })
}

fn optional_number(json: &JsonValue, section: &str, key: &str) -> Result<Option<f64>, Error> {
    let value = &json[section][key];
    if value.is_null() {
        return Ok(None);
    }
    value.as_f64().map(Some).ok_or(Error::InvalidValue {
        key: format!("{section}/{key}"),
        expected: "number",
    })
}

#[cfg(test)]
mod json_tests {
    use super::*;
    use crate::{CraftState, InputSource, Physics, TerrainGenerator};

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(parse_settings_str("{}").unwrap(), Settings::default());
    }

    #[test]
    fn partial_override() {
        let settings = parse_settings_str(
            r#"{
                "World": { "Width": 1000, "FloorY": 500 },
                "Lander": { "X": 100, "Fuel": 50.5 },
                "Physics": { "Gravity": 0.1 },
                "Seed": 7,
                "HistoryLimit": 500
            }"#,
        )
        .unwrap();
        assert_eq!(
            settings.terrain,
            TerrainGenerator::default().with_world_width(1000.)
        );
        assert_eq!(
            settings.lander,
            CraftState::default().with_x(100.).with_fuel(50.5)
        );
        assert_eq!(settings.physics, Physics::default().with_g(0.1));
        assert_eq!(settings.floor_y, 500.);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.history_limit, Some(500));
    }

    #[test]
    fn wrong_type_is_error() {
        assert_eq!(
            parse_settings_str(r#"{ "Physics": { "Damping": "high" } }"#),
            Err(Error::InvalidValue {
                key: "Physics/Damping".to_owned(),
                expected: "number"
            })
        );
        assert!(matches!(
            parse_settings_str(r#"{ "Seed": -3 }"#),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(matches!(parse_settings_str("{ nope"), Err(Error::Json(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            parse_settings("does/not/exist.json"),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn scenario_inputs() {
        let scenario = parse_scenario_str(
            r#"{
                "MaxTicks": 20,
                "Inputs": [
                    [true, false, false],
                    [0, 1, 0],
                    { "Right": true, "Ticks": 3 },
                    { "Up": 1 }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.max_ticks, 20);
        assert_eq!(scenario.settings, Settings::default());

        let mut inputs = scenario.inputs;
        let lander = CraftState::default();
        assert_eq!(inputs.len(), 6);
        assert_eq!(inputs.next_intent(0, &lander), InputIntent::new(true, false, false));
        assert_eq!(inputs.next_intent(1, &lander), InputIntent::new(false, true, false));
        assert_eq!(inputs.next_intent(4, &lander), InputIntent::new(false, false, true));
        assert_eq!(inputs.next_intent(5, &lander), InputIntent::new(true, false, false));
        assert_eq!(inputs.next_intent(6, &lander), InputIntent::idle());
    }

    #[test]
    fn scenario_defaults() {
        let scenario = parse_scenario_str("{}").unwrap();
        assert_eq!(scenario.max_ticks, DEFAULT_MAX_TICKS);
        assert!(scenario.inputs.is_empty());
    }

    #[test]
    fn bad_inputs() {
        assert!(parse_scenario_str(r#"{ "Inputs": [[true, false]] }"#).is_err());
        assert!(parse_scenario_str(r#"{ "Inputs": [[2, 0, 0]] }"#).is_err());
        assert!(parse_scenario_str(r#"{ "Inputs": ["up"] }"#).is_err());
        assert!(parse_scenario_str(r#"{ "Inputs": true }"#).is_err());
    }

    #[test]
    fn script_longer_than_max_ticks() {
        assert_eq!(
            parse_scenario_str(r#"{ "Inputs": [ { "Up": true, "Ticks": 18446744073709551615 } ] }"#),
            Err(Error::InvalidValue {
                key: "Inputs/0/Ticks".to_owned(),
                expected: "tick count keeping the script within MaxTicks"
            })
        );
        assert!(matches!(
            parse_scenario_str(r#"{ "MaxTicks": 4, "Inputs": [ [1, 0, 0], { "Ticks": 4 } ] }"#),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_scenario_str(r#"{ "MaxTicks": 1, "Inputs": [ [1, 0, 0], [0, 0, 1] ] }"#),
            Err(Error::InvalidValue { .. })
        ));

        let scenario =
            parse_scenario_str(r#"{ "MaxTicks": 4, "Inputs": [ [1, 0, 0], { "Ticks": 3 } ] }"#)
                .unwrap();
        assert_eq!(scenario.inputs.len(), 4);
    }
}
