use crate::census::*;

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const COUNTIES_FILE: &str = "counties.json";
pub const CHANGE_FILE: &str = "change_between_2011_and_2022_by_district.json";
pub const GEOJSON_FILE: &str = "geo.json";

pub fn default_year_file(year: CensusYear) -> String {
    format!("religious_denominations_{}.json", year)
}

/// The location of all the input files.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AssetPaths {
    pub counties: PathBuf,
    pub year_2011: PathBuf,
    pub year_2022: PathBuf,
    pub changes: PathBuf,
    /// The boundaries are optional: without them, the maps only carry the data.
    pub geojson: Option<PathBuf>,
}

impl AssetPaths {
    /// The standard file names in the given directory.
    ///
    /// The boundary file is only used if it is present.
    pub fn in_directory(dir: &Path) -> AssetPaths {
        let geo = dir.join(GEOJSON_FILE);
        AssetPaths {
            counties: dir.join(COUNTIES_FILE),
            year_2011: dir.join(default_year_file(CensusYear::Y2011)),
            year_2022: dir.join(default_year_file(CensusYear::Y2022)),
            changes: dir.join(CHANGE_FILE),
            geojson: if geo.exists() { Some(geo) } else { None },
        }
    }

    pub fn year(&self, year: CensusYear) -> &Path {
        match year {
            CensusYear::Y2011 => self.year_2011.as_path(),
            CensusYear::Y2022 => self.year_2022.as_path(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AssetSettings {
    pub directory: Option<String>,
    #[serde(rename = "countiesFile")]
    pub counties_file: Option<String>,
    #[serde(rename = "changeFile")]
    pub change_file: Option<String>,
    #[serde(rename = "geoJsonFile")]
    pub geojson_file: Option<String>,
    #[serde(rename = "yearFiles")]
    pub year_files: Option<BTreeMap<String, String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    year: Option<JSValue>,
    pub religion: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
    #[serde(rename = "longCsvFile")]
    pub long_csv_file: Option<String>,
    #[serde(rename = "referenceFile")]
    pub reference_file: Option<String>,
}

impl OutputSettings {
    pub fn year(&self) -> CensusResult<Option<CensusYear>> {
        if self.year.is_none() {
            return Ok(None);
        }
        let n = read_js_int(&self.year)?;
        let y = u32::try_from(n).ok().context(ParsingJsonNumberSnafu {
            value: n.to_string(),
        })?;
        CensusYear::from_number(y)
            .map(Some)
            .context(UnsupportedYearSnafu { year: y })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CensusConfig {
    pub assets: Option<AssetSettings>,
    #[serde(rename = "joinMode")]
    pub join_mode: Option<String>,
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
}

impl CensusConfig {
    pub fn join_mode(&self) -> CensusResult<JoinMode> {
        match self.join_mode.as_deref() {
            None | Some("permissive") => Ok(JoinMode::Permissive),
            Some("strict") => Ok(JoinMode::Strict),
            Some(x) => whatever!("unknown join mode: {} (expected permissive or strict)", x),
        }
    }

    /// Resolves the input files. Relative paths start from `config_dir`.
    pub fn asset_paths(&self, config_dir: &Path) -> CensusResult<AssetPaths> {
        let settings = match &self.assets {
            Some(s) => s,
            None => return Ok(AssetPaths::in_directory(config_dir)),
        };
        let dir: PathBuf = match settings.directory.as_deref() {
            Some(d) => config_dir.join(d),
            None => config_dir.to_path_buf(),
        };
        let mut paths = AssetPaths::in_directory(&dir);
        if let Some(f) = settings.counties_file.as_deref() {
            paths.counties = dir.join(f);
        }
        if let Some(f) = settings.change_file.as_deref() {
            paths.changes = dir.join(f);
        }
        if let Some(f) = settings.geojson_file.as_deref() {
            paths.geojson = Some(dir.join(f));
        }
        if let Some(files) = &settings.year_files {
            for (k, f) in files.iter() {
                let year_num = k
                    .parse::<u32>()
                    .ok()
                    .context(ParsingJsonNumberSnafu { value: k.as_str() })?;
                match CensusYear::from_number(year_num) {
                    Some(CensusYear::Y2011) => paths.year_2011 = dir.join(f),
                    Some(CensusYear::Y2022) => paths.year_2022 = dir.join(f),
                    None => return UnsupportedYearSnafu { year: year_num }.fail(),
                }
            }
        }
        Ok(paths)
    }

    pub fn to_options(&self, config_dir: &Path) -> CensusResult<RunOptions> {
        let mut opts = RunOptions::with_assets(self.asset_paths(config_dir)?);
        opts.join_mode = self.join_mode()?;
        if let Some(os) = &self.output_settings {
            if let Some(y) = os.year()? {
                opts.year = y;
            }
            if let Some(key) = os.religion.as_deref() {
                opts.religion = Religion::from_key(key).context(PipelineSnafu {})?;
            }
            let resolve = |f: &String| config_dir.join(f).display().to_string();
            opts.out = os.output_file.as_ref().map(|f| {
                if f == "stdout" {
                    f.clone()
                } else {
                    resolve(f)
                }
            });
            opts.long_csv = os.long_csv_file.as_ref().map(resolve);
            opts.reference = os.reference_file.as_ref().map(resolve);
        }
        Ok(opts)
    }
}

pub fn read_config(path: &str) -> CensusResult<CensusConfig> {
    let contents = read_json_file(Path::new(path))?;
    let config: CensusConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    info!("config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> CensusResult<JSValue> {
    let contents = read_json_file(Path::new(path))?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

/// Reads a whole file, telling a missing file apart from an unreadable one.
pub fn read_json_file(path: &Path) -> CensusResult<String> {
    let p = path.display().to_string();
    if !path.exists() {
        return NotFoundSnafu { path: p }.fail();
    }
    fs::read_to_string(path).context(OpeningJsonSnafu { path: p })
}

fn read_js_int(x: &Option<JSValue>) -> CensusResult<usize> {
    match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {
                value: n.to_string(),
            }),
        Some(JSValue::String(s)) => s
            .parse::<usize>()
            .ok()
            .context(ParsingJsonNumberSnafu { value: s.as_str() }),
        _ => None.context(ParsingJsonNumberSnafu {
            value: format!("{:?}", x),
        }),
    }
}
