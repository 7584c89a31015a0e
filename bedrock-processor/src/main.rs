use anyhow::{Context, Result};
use bedrock_core::TransformOptions;
use bedrock_geometry::{ConvertOptions, GeometryDescription, convert, model_name_for};
use clap::Parser;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Convert a Wavefront OBJ model into a Bedrock geometry file.
#[derive(Parser, Debug)]
#[command(name = "bedrock-processor", version, about)]
struct Args {
    /// The OBJ file to read
    #[arg(short, long)]
    input: PathBuf,

    /// The output file to write; printed to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// The model name; inferred from the input file name when omitted
    #[arg(short, long)]
    name: Option<String>,

    /// Invert the model's Y coordinates (useful for Java entity models)
    #[arg(long = "inverty")]
    invert_y: bool,

    /// Swap the second and third corner of every face, reversing winding
    #[arg(long = "swizzleyz")]
    swizzle: bool,

    /// Flip texture V coordinates, for models that targeted OpenGL
    #[arg(long = "fliptexture")]
    flip_texture: bool,

    /// Scale applied to every position
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    scale: f32,

    /// Translation along the Y axis, applied after scaling
    #[arg(long = "translatey", default_value_t = 0.0, allow_negative_numbers = true)]
    translate_y: f32,

    /// Texture width written to the geometry header
    #[arg(long, default_value_t = 1)]
    texture_width: u32,

    /// Texture height written to the geometry header
    #[arg(long, default_value_t = 1)]
    texture_height: u32,

    /// Visible bounds width written to the geometry header
    #[arg(long, default_value_t = 1)]
    visible_bounds_width: u32,

    /// Visible bounds height written to the geometry header
    #[arg(long, default_value_t = 1)]
    visible_bounds_height: u32,
}

impl Args {
    fn model_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => model_name_for(&self.input),
        }
    }

    fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            transform: TransformOptions {
                invert_y: self.invert_y,
                swizzle_winding: self.swizzle,
                flip_texture: self.flip_texture,
                scale: self.scale,
                translate_y: self.translate_y,
            },
            description: GeometryDescription {
                texture_width: self.texture_width,
                texture_height: self.texture_height,
                visible_bounds_width: self.visible_bounds_width,
                visible_bounds_height: self.visible_bounds_height,
                ..GeometryDescription::default()
            },
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start_total = Instant::now();
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read OBJ file: {}", args.input.display()))?;

    let name = args.model_name();
    info!("Converting {} as geometry.{}", args.input.display(), name);
    let result = convert(&source, &name, &args.convert_options())
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    match &args.output {
        Some(path) => {
            fs::write(path, &result)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!("Saved to {}", path.display());
        }
        None => println!("{}", result),
    }
    info!("Total execution time: {:.2}s", start_total.elapsed().as_secs_f32());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_identity_transform() {
        let args = Args::parse_from(["bedrock-processor", "-i", "models/zombie.obj"]);
        assert_eq!(args.model_name(), "zombie.obj");
        let options = args.convert_options();
        assert_eq!(options.transform, TransformOptions::default());
        assert_eq!(options.description, GeometryDescription::default());
    }

    #[test]
    fn flags_map_onto_options() {
        let args = Args::parse_from([
            "bedrock-processor",
            "--input",
            "in.obj",
            "--name",
            "zombie",
            "--inverty",
            "--swizzleyz",
            "--fliptexture",
            "--scale",
            "16",
            "--translatey",
            "-24",
            "--texture-width",
            "64",
        ]);
        assert_eq!(args.model_name(), "zombie");
        let options = args.convert_options();
        assert!(options.transform.invert_y);
        assert!(options.transform.swizzle_winding);
        assert!(options.transform.flip_texture);
        assert_eq!(options.transform.scale, 16.0);
        assert_eq!(options.transform.translate_y, -24.0);
        assert_eq!(options.description.texture_width, 64);
        assert_eq!(options.description.texture_height, 1);
    }

    #[test]
    fn blank_name_falls_back_to_file_name() {
        let args = Args::parse_from(["bedrock-processor", "-i", "a/b/cow.obj", "-n", "  "]);
        assert_eq!(args.model_name(), "cow.obj");
    }

    #[test]
    fn input_is_required() {
        assert!(Args::try_parse_from(["bedrock-processor"]).is_err());
    }
}
