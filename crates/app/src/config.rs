//! Command-line configuration.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use asset::{ImportOptions, LoadStrategy};

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub model: PathBuf,
    pub import: ImportOptions,
    /// Radius to normalize to; `None` keeps the file's coordinates.
    pub scale_to: Option<f32>,
    pub center: bool,
    pub reverse_winding: bool,
    /// Where colour maps are looked up. Defaults to the model's directory.
    pub texture_dir: Option<PathBuf>,
}

impl ViewerConfig {
    /// Accept: <model.obj> | --model=<path>, --scale=<f32>, --no-normalize,
    /// --no-center, --reverse-winding, --rebuild-normals, --single-pass,
    /// --texture-dir=<dir>
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut model: Option<PathBuf> = None;
        let mut import = ImportOptions::default();
        let mut scale_to = Some(1.0);
        let mut normalize = true;
        let mut center = true;
        let mut reverse_winding = false;
        let mut texture_dir = None;

        for arg in args {
            let arg = arg.as_ref();
            if let Some(v) = arg.strip_prefix("--model=") {
                model = Some(PathBuf::from(v));
            } else if let Some(v) = arg.strip_prefix("--scale=") {
                match v.parse::<f32>() {
                    Ok(s) if s > 0.0 && s.is_finite() => scale_to = Some(s),
                    _ => log::warn!("Ignoring invalid --scale value '{}'", v),
                }
            } else if let Some(v) = arg.strip_prefix("--texture-dir=") {
                texture_dir = Some(PathBuf::from(v));
            } else {
                match arg {
                    "--no-normalize" => normalize = false,
                    "--no-center" => center = false,
                    "--reverse-winding" => reverse_winding = true,
                    "--rebuild-normals" => import.rebuild_normals = true,
                    "--single-pass" => import.strategy = LoadStrategy::SinglePass,
                    other if other.starts_with("--") => {
                        log::warn!("Unknown flag '{}', ignored", other);
                    }
                    path => {
                        if model.is_none() {
                            model = Some(PathBuf::from(path));
                        }
                    }
                }
            }
        }

        let model = model.ok_or_else(|| anyhow!("No model given; pass a path or --model=<path>"))?;
        Ok(Self {
            model,
            import,
            scale_to: scale_to.filter(|_| normalize),
            center,
            reverse_winding,
            texture_dir,
        })
    }

    pub fn texture_dir(&self) -> PathBuf {
        self.texture_dir.clone().unwrap_or_else(|| {
            self.model
                .parent()
                .map(PathBuf::from)
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_with_positional_model() {
        let cfg = ViewerConfig::from_args(["ships/bigship1.obj"]).expect("config");
        assert_eq!(cfg.model, PathBuf::from("ships/bigship1.obj"));
        assert_eq!(cfg.import, ImportOptions::default());
        assert_eq!(cfg.scale_to, Some(1.0));
        assert!(cfg.center);
        assert!(!cfg.reverse_winding);
        assert_eq!(cfg.texture_dir(), PathBuf::from("ships"));
    }

    #[test]
    fn all_flags() {
        let cfg = ViewerConfig::from_args([
            "--model=m.obj",
            "--scale=2.5",
            "--no-center",
            "--reverse-winding",
            "--rebuild-normals",
            "--single-pass",
            "--texture-dir=tex",
        ])
        .expect("config");
        assert_eq!(cfg.model, PathBuf::from("m.obj"));
        assert_eq!(cfg.scale_to, Some(2.5));
        assert!(!cfg.center);
        assert!(cfg.reverse_winding);
        assert!(cfg.import.rebuild_normals);
        assert_eq!(cfg.import.strategy, LoadStrategy::SinglePass);
        assert_eq!(cfg.texture_dir(), PathBuf::from("tex"));
    }

    #[test]
    fn no_normalize_and_bad_scale() {
        let cfg = ViewerConfig::from_args(["m.obj", "--scale=-1", "--no-normalize"]).expect("cfg");
        assert_eq!(cfg.scale_to, None);

        let cfg = ViewerConfig::from_args(["m.obj", "--scale=abc"]).expect("cfg");
        assert_eq!(cfg.scale_to, Some(1.0));
    }

    #[test]
    fn model_is_required() {
        assert!(ViewerConfig::from_args(["--single-pass"]).is_err());
    }
}
