use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use ndarray::{Array3, Axis};

use densepose_labels_core::centroids::domain::annotation_canvas::annotate_centroids;
use densepose_labels_core::centroids::domain::centroid::{calculate_centroids, CentroidConfig};
use densepose_labels_core::centroids::domain::component_labeller::Connectivity;
use densepose_labels_core::centroids::infrastructure::imageproc_component_labeller::ImageprocComponentLabeller;
use densepose_labels_core::centroids::infrastructure::marker_canvas::MarkerCanvas;
use densepose_labels_core::evaluation::domain::iou_table::calculate_iou_table;
use densepose_labels_core::evaluation::domain::overall_iou::calculate_overall_iou;
use densepose_labels_core::evaluation::infrastructure::csv_table_writer::write_iou_table_csv_file;
use densepose_labels_core::labels::domain::remap::remap_parts;
use densepose_labels_core::labels::domain::resize::resize_label_map;
use densepose_labels_core::labels::domain::semantic_grouping::coarse_body_grouping;
use densepose_labels_core::labels::infrastructure::iuv_reader::load_iuv;
use densepose_labels_core::labels::infrastructure::label_image_file::{
    read_label_map, write_label_map,
};
use densepose_labels_core::scoring::domain::best_remapping::compute_best_iou_remapping;
use densepose_labels_core::scoring::infrastructure::kuhn_munkres_assigner::KuhnMunkresAssigner;
use densepose_labels_core::shared::constants::{DEFAULT_EXCLUDED_COLUMNS, IMAGE_EXTENSIONS};
use densepose_labels_core::shared::label_map::{Label, LabelMap};
use densepose_labels_core::shared::part_vocabulary::{part_name, PART_NAMES};

/// DensePose label-map analysis: centroids, part regrouping and IoU scoring.
#[derive(Parser)]
#[command(name = "densepose-labels")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print part centroids of an IUV image as JSON.
    Centroids {
        /// Input IUV image.
        iuv: PathBuf,

        /// Split each part into connected regions first.
        #[arg(long)]
        cca: bool,

        /// Label treated as background.
        #[arg(long, default_value = "0")]
        background: Label,

        /// Pixel connectivity for region splitting: 4 or 8.
        #[arg(long, default_value = "8")]
        connectivity: u8,

        /// Write a false-colour image with centroid markers.
        #[arg(long)]
        annotate: Option<PathBuf>,
    },

    /// Regroup the part index of an IUV image into coarse body regions.
    Remap {
        /// Input IUV image.
        iuv: PathBuf,

        /// Output label image.
        output: PathBuf,
    },

    /// Score predicted label images against ground truth.
    Score {
        /// Predicted label images, or directories of them.
        #[arg(long, num_args = 1.., required = true)]
        predicted: Vec<PathBuf>,

        /// Ground-truth label images, or directories of them.
        #[arg(long, num_args = 1.., required = true)]
        target: Vec<PathBuf>,

        /// Label names in id order (defaults to the DensePose part names).
        #[arg(long, value_delimiter = ',')]
        labels: Option<Vec<String>>,

        /// Resize every map to HEIGHTxWIDTH before scoring.
        #[arg(long)]
        size: Option<String>,

        /// Relabel each prediction through its best IoU correspondence.
        #[arg(long)]
        best_match: bool,

        /// Columns left out of the overall score.
        #[arg(long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,

        /// Write the per-sample IoU table as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Centroids {
            iuv,
            cca,
            background,
            connectivity,
            annotate,
        } => run_centroids(&iuv, cca, background, connectivity, annotate.as_deref()),
        Command::Remap { iuv, output } => run_remap(&iuv, &output),
        Command::Score {
            predicted,
            target,
            labels,
            size,
            best_match,
            exclude,
            csv,
        } => {
            let size = size.as_deref().map(parse_size).transpose()?;
            let label_names =
                labels.unwrap_or_else(|| PART_NAMES.iter().map(|n| n.to_string()).collect());
            let exclude = exclude.unwrap_or_else(|| {
                DEFAULT_EXCLUDED_COLUMNS
                    .iter()
                    .map(|c| c.to_string())
                    .collect()
            });
            run_score(
                &predicted,
                &target,
                &label_names,
                size,
                best_match,
                &exclude,
                csv.as_deref(),
            )
        }
    }
}

fn run_centroids(
    iuv: &Path,
    cca: bool,
    background: Label,
    connectivity: u8,
    annotate: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let connectivity = match connectivity {
        4 => Connectivity::Four,
        8 => Connectivity::Eight,
        other => return Err(format!("Connectivity must be 4 or 8, got {other}").into()),
    };
    let labels = load_iuv(iuv)?.labels();
    let config = CentroidConfig {
        connected_components: cca,
        background,
    };
    let labeller = ImageprocComponentLabeller::new(connectivity);
    let centroids = calculate_centroids(&labels, &config, &labeller);
    log::info!("Found {} centroids in {}", centroids.len(), iuv.display());

    if let Some(out) = annotate {
        let texts: Vec<String> = centroids
            .iter()
            .map(|c| part_name(c.label).map_or_else(|| c.label.to_string(), str::to_string))
            .collect();
        let mut canvas = MarkerCanvas::from_label_map(&labels);
        let drawn = annotate_centroids(&mut canvas, &centroids, &texts);
        canvas.into_image().save(out)?;
        log::info!("Annotated {drawn} centroids into {}", out.display());
    }

    println!("{}", serde_json::to_string_pretty(&centroids)?);
    Ok(())
}

fn run_remap(iuv: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let grouping = coarse_body_grouping();
    let table = grouping.to_remap_table(&grouping.group_names())?;
    let labels = load_iuv(iuv)?.labels();
    write_label_map(output, &remap_parts(&labels, &table))?;
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn run_score(
    predicted: &[PathBuf],
    target: &[PathBuf],
    label_names: &[String],
    size: Option<(usize, usize)>,
    best_match: bool,
    exclude: &[String],
    csv: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let predicted_paths = expand_inputs(predicted)?;
    let target_paths = expand_inputs(target)?;
    if predicted_paths.len() != target_paths.len() {
        return Err(format!(
            "Got {} predicted but {} target images",
            predicted_paths.len(),
            target_paths.len()
        )
        .into());
    }
    if predicted_paths.is_empty() {
        return Err("No label images found".into());
    }

    let mut predicted_maps = load_maps(&predicted_paths, size)?;
    let target_maps = load_maps(&target_paths, size)?;

    if best_match {
        let assigner = KuhnMunkresAssigner::default();
        for (pred, gt) in predicted_maps.iter_mut().zip(&target_maps) {
            let table = compute_best_iou_remapping(&*pred, gt, &assigner)?;
            *pred = remap_parts(&*pred, &table);
        }
    }

    let predicted_batch = stack_maps(&predicted_maps)?;
    let target_batch = stack_maps(&target_maps)?;
    let names: Vec<&str> = label_names.iter().map(String::as_str).collect();
    let table = calculate_iou_table(&predicted_batch, &target_batch, &names)?;

    if let Some(path) = csv {
        write_iou_table_csv_file(&table, path)?;
    }

    let exclude: Vec<&str> = exclude.iter().map(String::as_str).collect();
    let overall = calculate_overall_iou(&table, &exclude);
    println!("{}", serde_json::to_string_pretty(&overall)?);
    Ok(())
}

/// Files are taken as-is; directories contribute their image files in
/// name order.
fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| is_image(p))
                .collect();
            entries.sort();
            paths.extend(entries);
        } else if input.exists() {
            paths.push(input.clone());
        } else {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    Ok(paths)
}

fn load_maps(
    paths: &[PathBuf],
    size: Option<(usize, usize)>,
) -> Result<Vec<LabelMap>, Box<dyn std::error::Error>> {
    paths
        .iter()
        .map(|path| -> Result<LabelMap, Box<dyn std::error::Error>> {
            let map = read_label_map(path)?;
            Ok(match size {
                Some(size) => resize_label_map(&map, size)?,
                None => map,
            })
        })
        .collect()
}

fn stack_maps(maps: &[LabelMap]) -> Result<Array3<Label>, Box<dyn std::error::Error>> {
    let views: Vec<_> = maps.iter().map(|m| m.view()).collect();
    ndarray::stack(Axis(0), &views)
        .map_err(|e| format!("Label maps differ in shape, pass --size to resize: {e}").into())
}

fn parse_size(text: &str) -> Result<(usize, usize), Box<dyn std::error::Error>> {
    let (h, w) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Size must look like HEIGHTxWIDTH, got '{text}'"))?;
    let size = (h.trim().parse::<usize>()?, w.trim().parse::<usize>()?);
    if size.0 == 0 || size.1 == 0 {
        return Err(format!("Size must be non-zero, got '{text}'").into());
    }
    Ok(size)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
