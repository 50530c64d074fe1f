use pest_derive::Parser;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[grammar = "bin/rs_lights.pest"]
struct SceneParser;

// parser
use pest::iterators::Pair;
use pest::Parser as _;
// command line options
use clap::Parser as _;
// others
use log::{error, info, warn};
use thiserror::Error;
// lights
use rs_lights::core::api::{commit_lights, lights_init, make_light};
use rs_lights::core::geometry::{Point3f, Vector3f};
use rs_lights::core::light::{Light, LightError};
use rs_lights::core::paramset::{ParamSet, ParamType};
use rs_lights::core::pbrt::{Float, Spectrum};
use rs_lights::device::{ConfigError, Device, DeviceConfig};
// std
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// Create and commit the lights described in a scene file, then print
/// their device equivalents.
#[derive(clap::Parser)]
#[command(version)]
struct Cli {
    /// use specified number of threads for committing
    #[arg(short = 't', long = "nthreads", default_value_t = 0)]
    nthreads: u8,
    /// device configuration (TOML)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
    /// override the device capacity from the configuration
    #[arg(long = "max-lights")]
    max_lights: Option<usize>,
    /// The path to the file to read
    path: PathBuf,
}

#[derive(Error, Debug)]
enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("syntax error: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
    #[error("parameter \"{name}\": {reason}")]
    Value { name: String, reason: String },
    #[error(transparent)]
    Light(#[from] LightError),
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

enum Statement {
    LightSource {
        name: Option<String>,
        light_type: String,
        params: ParamSet,
    },
    Update {
        name: String,
        params: ParamSet,
    },
}

fn string_value(pair: Pair<Rule>) -> String {
    // string = ${ "\"" ~ inner ~ "\"" }
    pair.into_inner()
        .next()
        .map_or_else(String::new, |inner| String::from(inner.as_str()))
}

fn float_values(name: &str, values: &[Pair<Rule>]) -> Result<Vec<Float>, SceneError> {
    values
        .iter()
        .map(|v| match v.as_rule() {
            Rule::number => Float::from_str(v.as_str()).map_err(|e| SceneError::Value {
                name: String::from(name),
                reason: e.to_string(),
            }),
            _ => Err(SceneError::Value {
                name: String::from(name),
                reason: format!("expected a number, found {}", v.as_str()),
            }),
        })
        .collect()
}

fn int_values(name: &str, values: &[Pair<Rule>]) -> Result<Vec<i32>, SceneError> {
    values
        .iter()
        .map(|v| {
            i32::from_str(v.as_str()).map_err(|_| SceneError::Value {
                name: String::from(name),
                reason: format!("expected an integer, found {}", v.as_str()),
            })
        })
        .collect()
}

fn bool_value(name: &str, value: &Pair<Rule>) -> Result<bool, SceneError> {
    let text: String = match value.as_rule() {
        Rule::string => string_value(value.clone()),
        _ => String::from(value.as_str()),
    };
    match text.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(SceneError::Value {
            name: String::from(name),
            reason: format!("expected true or false, found {}", text),
        }),
    }
}

fn single<'a, T>(name: &str, values: &'a [T]) -> Result<&'a T, SceneError> {
    if values.len() == 1 {
        Ok(&values[0])
    } else {
        Err(SceneError::Value {
            name: String::from(name),
            reason: format!("expected a single value, found {}", values.len()),
        })
    }
}

fn extract_parameter(params: &mut ParamSet, pair: Pair<Rule>) -> Result<(), SceneError> {
    let mut inner = pair.into_inner();
    let (type_str, name) = match inner.next() {
        Some(declaration) => {
            let mut parts = declaration.into_inner();
            let type_str = parts.next().map(|p| p.as_str()).unwrap_or_default();
            let name = parts.next().map(|p| p.as_str()).unwrap_or_default();
            (type_str, name)
        }
        None => unreachable!(),
    };
    let values: Vec<Pair<Rule>> = match inner.next() {
        Some(list) if list.as_rule() == Rule::list => list.into_inner().collect(),
        Some(value) => vec![value],
        None => Vec::new(),
    };
    let param_type = ParamType::from_str(type_str).map_err(|_| SceneError::Value {
        name: String::from(name),
        reason: format!("unknown parameter type \"{}\"", type_str),
    })?;
    match param_type {
        ParamType::Float => {
            let floats = float_values(name, &values)?;
            if floats.len() == 1 {
                params.add_float(name, floats[0]);
            } else {
                params.add_floats(name, floats);
            }
        }
        ParamType::Integer => {
            let ints = int_values(name, &values)?;
            if ints.len() == 1 {
                params.add_int(name, ints[0]);
            } else {
                params.add_ints(name, ints);
            }
        }
        ParamType::Bool => {
            let b = bool_value(name, single(name, &values)?)?;
            params.add_bool(name, b);
        }
        ParamType::String => {
            let value = single(name, &values)?;
            if value.as_rule() != Rule::string {
                return Err(SceneError::Value {
                    name: String::from(name),
                    reason: format!("expected a quoted string, found {}", value.as_str()),
                });
            }
            params.add_string(name, string_value(value.clone()));
        }
        ParamType::Point3 => {
            let floats = float_values(name, &values)?;
            if floats.len() == 3 {
                params.add_point3f(name, Point3f::new(floats[0], floats[1], floats[2]));
            } else {
                params.add_point3fs(name, floats)?;
            }
        }
        ParamType::Vector3 => {
            let floats = float_values(name, &values)?;
            if floats.len() == 3 {
                params.add_vector3f(name, Vector3f::new(floats[0], floats[1], floats[2]));
            } else {
                params.add_vector3fs(name, floats)?;
            }
        }
        ParamType::Normal => {
            let floats = float_values(name, &values)?;
            params.add_normal3fs(name, floats)?;
        }
        ParamType::Rgb => {
            let floats = float_values(name, &values)?;
            if floats.len() == 3 {
                params.add_rgb_spectrum(name, Spectrum::rgb(floats[0], floats[1], floats[2]));
            } else {
                params.add_rgb_spectra(name, floats)?;
            }
        }
    }
    Ok(())
}

fn extract_params(pairs: pest::iterators::Pairs<Rule>) -> Result<ParamSet, SceneError> {
    let mut params: ParamSet = ParamSet::default();
    for pair in pairs {
        if pair.as_rule() == Rule::parameter {
            extract_parameter(&mut params, pair)?;
        }
    }
    Ok(params)
}

fn parse_scene(source: &str) -> Result<Vec<Statement>, SceneError> {
    let scene = SceneParser::parse(Rule::scene, source)
        .map_err(Box::new)?
        .next()
        .map(|pair| pair.into_inner());
    let mut statements: Vec<Statement> = Vec::new();
    for pair in scene.into_iter().flatten() {
        match pair.as_rule() {
            Rule::light_source => {
                let mut inner = pair.into_inner();
                let light_type = inner.next().map(string_value).unwrap_or_default();
                statements.push(Statement::LightSource {
                    name: None,
                    light_type,
                    params: extract_params(inner)?,
                });
            }
            Rule::named_light_source => {
                let mut inner = pair.into_inner();
                let name = inner.next().map(string_value).unwrap_or_default();
                let light_type = inner.next().map(string_value).unwrap_or_default();
                statements.push(Statement::LightSource {
                    name: Some(name),
                    light_type,
                    params: extract_params(inner)?,
                });
            }
            Rule::update => {
                let mut inner = pair.into_inner();
                let name = inner.next().map(string_value).unwrap_or_default();
                statements.push(Statement::Update {
                    name,
                    params: extract_params(inner)?,
                });
            }
            Rule::EOI => {}
            _ => unreachable!(),
        }
    }
    Ok(statements)
}

/// Maps the names of `NamedLightSource` statements to their index.
/// Unnamed lights can't be updated; a name given twice refers to the
/// later light.
fn update_targets<'a, I>(names: I) -> HashMap<String, usize>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut targets: HashMap<String, usize> = HashMap::new();
    for (i, name) in names.into_iter().enumerate() {
        if let Some(name) = name {
            if targets.insert(String::from(name), i).is_some() {
                warn!(
                    "light \"{}\" defined more than once, updates go to the last one",
                    name
                );
            }
        }
    }
    targets
}

fn run(args: Cli) -> Result<(), SceneError> {
    let mut config: DeviceConfig = match args.config {
        Some(ref path) => DeviceConfig::load_from_file(path)?,
        None => DeviceConfig::default(),
    };
    if args.max_lights.is_some() {
        config.max_lights = args.max_lights;
    }
    let num_threads: usize = if args.nthreads == 0_u8 {
        num_cpus::get()
    } else {
        args.nthreads as usize
    };
    info!(
        "rs_lights version {} [device \"{}\", {} threads]",
        VERSION, config.label, num_threads
    );
    lights_init();
    let device = Device::new(config);
    let source = fs::read_to_string(&args.path)?;
    let statements = parse_scene(&source)?;
    // create every light first ...
    let mut names: Vec<Option<String>> = Vec::new();
    let mut labels: Vec<String> = Vec::new();
    let mut lights: Vec<Box<dyn Light>> = Vec::new();
    let mut params: Vec<ParamSet> = Vec::new();
    let mut updates: Vec<(String, ParamSet)> = Vec::new();
    for statement in statements {
        match statement {
            Statement::LightSource {
                name,
                light_type,
                params: light_params,
            } => match make_light(&light_type, &device) {
                Ok(light) => {
                    labels.push(
                        name.clone()
                            .unwrap_or_else(|| format!("{}#{}", light_type, lights.len())),
                    );
                    names.push(name);
                    lights.push(light);
                    params.push(light_params);
                }
                Err(e) => error!("skipping light source: {}", e),
            },
            Statement::Update {
                name,
                params: update_params,
            } => updates.push((name, update_params)),
        }
    }
    // ... then commit them in parallel
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()?;
    let results = pool.install(|| commit_lights(&mut lights, &params));
    let mut committed: Vec<(Option<String>, String, Box<dyn Light>)> = Vec::new();
    for (((name, label), light), result) in names
        .into_iter()
        .zip(labels)
        .zip(lights)
        .zip(results)
    {
        match result {
            Ok(()) => committed.push((name, label, light)),
            Err(e) => error!("skipping light \"{}\" ({}): {}", label, light.type_name(), e),
        }
    }
    // updates re-commit in file order
    let by_name: HashMap<String, usize> =
        update_targets(committed.iter().map(|(name, _, _)| name.as_deref()));
    for (name, update_params) in updates {
        match by_name.get(&name) {
            Some(&i) => {
                let light = &mut committed[i].2;
                if let Err(e) = light.commit(&update_params) {
                    warn!("update of \"{}\" rejected, keeping previous state: {}", name, e);
                }
                update_params.report_unused();
            }
            None => warn!("update of unknown light \"{}\" ignored", name),
        }
    }
    for (_, label, light) in &committed {
        println!(
            "{} [{}] {} {:?}",
            label,
            light.type_name(),
            light.device_id(),
            light.device_handle()
        );
    }
    info!(
        "{} light(s) committed, {} device equivalent(s) alive",
        committed.len(),
        device.live_equivalents()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Cli::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SCENE: &str = r#"
# key and fill
NamedLightSource "key" "spot" "point3 position" [0 4 0] "vector direction" [0 -1 0]
    "float openingAngle" 60 "rgb color" [1 0.9 0.8]
LightSource "ambient" "float intensity" 0.25
LightSource "quad" "bool twoSided" "true" "integer samples" 4 "string note" "ignored"
Update "key" "float intensity" [2.5]
"#;

    #[test]
    fn statements_and_parameters() {
        let statements = parse_scene(SCENE).unwrap();
        assert_eq!(statements.len(), 4);
        match &statements[0] {
            Statement::LightSource {
                name,
                light_type,
                params,
            } => {
                assert_eq!(name.as_deref(), Some("key"));
                assert_eq!(light_type, "spot");
                assert_eq!(
                    params.get_point3("position", Point3f::default()).unwrap(),
                    Point3f::new(0.0, 4.0, 0.0)
                );
                assert_eq!(params.get_float("openingAngle", 180.0).unwrap(), 60.0);
                assert_eq!(
                    params.get_spectrum("color", Spectrum::new(1.0)).unwrap(),
                    Spectrum::rgb(1.0, 0.9, 0.8)
                );
            }
            _ => panic!("expected a light source"),
        }
        match &statements[2] {
            Statement::LightSource { params, .. } => {
                assert!(params.get_bool("twoSided", false).unwrap());
                assert_eq!(params.get_int("samples", 1).unwrap(), 4);
                assert_eq!(params.get_string("note", "").unwrap(), "ignored");
            }
            _ => panic!("expected a light source"),
        }
        match &statements[3] {
            Statement::Update { name, params } => {
                assert_eq!(name, "key");
                assert_eq!(params.get_float("intensity", 1.0).unwrap(), 2.5);
            }
            _ => panic!("expected an update"),
        }
    }

    #[test]
    fn only_named_lights_are_update_targets() {
        let names = vec![Some("ambient1"), None, Some("key"), None, Some("key")];
        let targets = update_targets(names);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets.get("ambient1"), Some(&0));
        assert_eq!(targets.get("key"), Some(&4));
        assert_eq!(targets.get("ambient#1"), None);
    }

    #[test]
    fn unknown_parameter_type() {
        assert!(parse_scene("LightSource \"point\" \"texture map\" \"sky\"").is_err());
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(matches!(
            parse_scene("LightSource point"),
            Err(SceneError::Syntax(_))
        ));
    }

    #[test]
    fn numbers_where_strings_are_expected() {
        assert!(parse_scene("LightSource \"hdri\" \"string map\" 3").is_err());
        assert!(parse_scene("LightSource \"point\" \"float intensity\" \"bright\"").is_err());
    }
}
