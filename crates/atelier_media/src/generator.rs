//! Per-type derivative generation strategies.

use crate::tools::ScratchFile;
use crate::{placeholder, probe, raster, video, waveform};
use atelier_core::{Asset, AssetType, DerivativeStage, ProcessingWarning};
use atelier_error::AtelierError;
use atelier_storage::{AssetPaths, ByteStore};
use std::collections::BTreeMap;

/// Merged result of the three derivative sub-tasks.
///
/// Always returned, even under partial failure; degradations are recorded
/// in `warnings` and the corresponding fields stay unset or defaulted.
#[derive(Debug, Clone, Default)]
pub struct DerivativeOutcome {
    /// Store path of the generated thumbnail
    pub thumbnail_url: Option<String>,
    /// Store path of the generated preview/waveform
    pub preview_url: Option<String>,
    /// Pixel width, when probed
    pub width: Option<i32>,
    /// Pixel height, when probed
    pub height: Option<i32>,
    /// Playback duration in seconds, when probed
    pub duration_seconds: Option<f32>,
    /// Flat technical metadata
    pub metadata: BTreeMap<String, String>,
    /// Degradations encountered along the way
    pub warnings: Vec<ProcessingWarning>,
}

impl DerivativeOutcome {
    /// Merge this outcome into an asset record.
    ///
    /// Type constraints are enforced here: dimensions only land on
    /// image/video assets, duration only on video/audio.
    pub fn apply_to(self, asset: &mut Asset) {
        if self.thumbnail_url.is_some() {
            asset.thumbnail_url = self.thumbnail_url;
        }
        if self.preview_url.is_some() {
            asset.preview_url = self.preview_url;
        }
        if asset.asset_type.has_dimensions() {
            asset.width = self.width;
            asset.height = self.height;
        }
        if asset.asset_type.has_duration() {
            asset.duration_seconds = self.duration_seconds;
        }
        asset.merge_metadata(self.metadata);
        asset.processing_warnings.extend(self.warnings);
    }
}

/// Write the generated placeholder thumbnail, recording a warning when even
/// that degrades.
async fn fallback_thumbnail(
    asset_type: AssetType,
    paths: &AssetPaths,
    store: &dyn ByteStore,
    warnings: &mut Vec<ProcessingWarning>,
) -> Option<String> {
    let png = match placeholder::render(asset_type) {
        Ok(png) => png,
        Err(e) => {
            warnings.push(ProcessingWarning::new(
                DerivativeStage::Thumbnail,
                e.to_string(),
            ));
            return None;
        }
    };
    let path = paths.thumbnail("png");
    match store.write(&path, &png).await {
        Ok(()) => Some(path),
        Err(e) => {
            warnings.push(ProcessingWarning::new(
                DerivativeStage::Thumbnail,
                e.to_string(),
            ));
            None
        }
    }
}

/// One strategy per asset type, invoked after the original is at its
/// canonical byte-store path.
///
/// The thumbnail, preview, and metadata sub-tasks are independent and run
/// concurrently; none depends on another's output, and a failing sub-task
/// never aborts the overall ingestion.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivativeGenerator;

impl DerivativeGenerator {
    /// Create a generator.
    pub fn new() -> Self {
        Self
    }

    /// Produce derivatives and probed metadata for an asset.
    #[tracing::instrument(skip(self, data, paths, store), fields(asset_type = %asset_type, size = data.len()))]
    pub async fn generate(
        &self,
        asset_type: AssetType,
        data: &[u8],
        extension: &str,
        paths: &AssetPaths,
        store: &dyn ByteStore,
    ) -> DerivativeOutcome {
        let outcome = match asset_type {
            AssetType::Image => self.generate_image(data, paths, store).await,
            AssetType::Video => self.generate_video(data, extension, paths, store).await,
            AssetType::Audio => self.generate_audio(data, extension, paths, store).await,
            AssetType::Document | AssetType::Other => {
                self.generate_static(asset_type, paths, store).await
            }
        };

        if !outcome.warnings.is_empty() {
            tracing::warn!(
                asset_type = %asset_type,
                warnings = outcome.warnings.len(),
                "Derivative generation degraded"
            );
        }
        outcome
    }

    async fn generate_image(
        &self,
        data: &[u8],
        paths: &AssetPaths,
        store: &dyn ByteStore,
    ) -> DerivativeOutcome {
        let thumbnail_task = async {
            let img = raster::decode(data)?;
            let jpeg = raster::scale_to_jpeg(&img, raster::THUMBNAIL_MAX.0, raster::THUMBNAIL_MAX.1)?;
            let path = paths.thumbnail("jpg");
            store.write(&path, &jpeg).await?;
            Ok::<String, AtelierError>(path)
        };
        let preview_task = async {
            let img = raster::decode(data)?;
            let jpeg = raster::scale_to_jpeg(&img, raster::PREVIEW_MAX.0, raster::PREVIEW_MAX.1)?;
            let path = paths.preview("jpg");
            store.write(&path, &jpeg).await?;
            Ok::<String, AtelierError>(path)
        };
        let probe_task = async { raster::probe_dimensions(data).map_err(AtelierError::from) };

        let (thumbnail, preview, probed) = tokio::join!(thumbnail_task, preview_task, probe_task);

        let mut outcome = DerivativeOutcome::default();
        match thumbnail {
            Ok(path) => outcome.thumbnail_url = Some(path),
            Err(e) => {
                outcome.warnings.push(ProcessingWarning::new(
                    DerivativeStage::Thumbnail,
                    e.to_string(),
                ));
                outcome.thumbnail_url =
                    fallback_thumbnail(AssetType::Image, paths, store, &mut outcome.warnings).await;
            }
        }
        match preview {
            Ok(path) => outcome.preview_url = Some(path),
            Err(e) => outcome.warnings.push(ProcessingWarning::new(
                DerivativeStage::Preview,
                e.to_string(),
            )),
        }
        match probed {
            Ok((width, height, format)) => {
                outcome.width = Some(width as i32);
                outcome.height = Some(height as i32);
                outcome.metadata.insert("format".to_string(), format);
            }
            Err(e) => outcome.warnings.push(ProcessingWarning::new(
                DerivativeStage::Metadata,
                e.to_string(),
            )),
        }
        outcome
    }

    async fn generate_video(
        &self,
        data: &[u8],
        extension: &str,
        paths: &AssetPaths,
        store: &dyn ByteStore,
    ) -> DerivativeOutcome {
        let mut outcome = DerivativeOutcome::default();
        let scratch = match ScratchFile::create(data, extension).await {
            Ok(scratch) => scratch,
            Err(e) => {
                outcome.warnings.push(ProcessingWarning::new(
                    DerivativeStage::Preview,
                    e.to_string(),
                ));
                outcome.warnings.push(ProcessingWarning::new(
                    DerivativeStage::Metadata,
                    e.to_string(),
                ));
                outcome.thumbnail_url =
                    fallback_thumbnail(AssetType::Video, paths, store, &mut outcome.warnings).await;
                return outcome;
            }
        };

        let thumbnail_task = async {
            // Representative frame at ~10% of playback; an unprobeable
            // duration degrades to the first frame.
            let at = match probe::probe_duration(&scratch).await {
                Ok(duration) => duration * video::THUMBNAIL_POSITION,
                Err(_) => 0.0,
            };
            let jpeg = video::extract_frame(&scratch, at).await?;
            let path = paths.thumbnail("jpg");
            store.write(&path, &jpeg).await?;
            Ok::<String, AtelierError>(path)
        };
        let preview_task = async {
            let start = match probe::probe_duration(&scratch).await {
                Ok(duration) => duration * video::THUMBNAIL_POSITION,
                Err(_) => 0.0,
            };
            let gif = video::render_gif_preview(&scratch, start).await?;
            let path = paths.preview("gif");
            store.write(&path, &gif).await?;
            Ok::<String, AtelierError>(path)
        };
        let probe_task = async { probe::probe_file(&scratch).await.map_err(AtelierError::from) };

        let (thumbnail, preview, probed) = tokio::join!(thumbnail_task, preview_task, probe_task);

        match thumbnail {
            Ok(path) => outcome.thumbnail_url = Some(path),
            Err(e) => {
                outcome.warnings.push(ProcessingWarning::new(
                    DerivativeStage::Thumbnail,
                    e.to_string(),
                ));
                outcome.thumbnail_url =
                    fallback_thumbnail(AssetType::Video, paths, store, &mut outcome.warnings).await;
            }
        }
        match preview {
            Ok(path) => outcome.preview_url = Some(path),
            Err(e) => outcome.warnings.push(ProcessingWarning::new(
                DerivativeStage::Preview,
                e.to_string(),
            )),
        }
        match probed {
            Ok(report) => {
                outcome.width = report.width;
                outcome.height = report.height;
                outcome.duration_seconds = report.duration_seconds;
                outcome.metadata.extend(report.metadata);
            }
            Err(e) => outcome.warnings.push(ProcessingWarning::new(
                DerivativeStage::Metadata,
                e.to_string(),
            )),
        }
        outcome
    }

    async fn generate_audio(
        &self,
        data: &[u8],
        extension: &str,
        paths: &AssetPaths,
        store: &dyn ByteStore,
    ) -> DerivativeOutcome {
        let mut outcome = DerivativeOutcome::default();
        outcome.thumbnail_url =
            fallback_thumbnail(AssetType::Audio, paths, store, &mut outcome.warnings).await;

        let scratch = match ScratchFile::create(data, extension).await {
            Ok(scratch) => scratch,
            Err(e) => {
                outcome.warnings.push(ProcessingWarning::new(
                    DerivativeStage::Preview,
                    e.to_string(),
                ));
                outcome.warnings.push(ProcessingWarning::new(
                    DerivativeStage::Metadata,
                    e.to_string(),
                ));
                return outcome;
            }
        };

        let preview_task = async {
            let png = waveform::waveform_from_file(&scratch).await?;
            let path = paths.preview("png");
            store.write(&path, &png).await?;
            Ok::<String, AtelierError>(path)
        };
        let probe_task = async { probe::probe_file(&scratch).await.map_err(AtelierError::from) };

        let (preview, probed) = tokio::join!(preview_task, probe_task);

        match preview {
            Ok(path) => outcome.preview_url = Some(path),
            Err(e) => outcome.warnings.push(ProcessingWarning::new(
                DerivativeStage::Preview,
                e.to_string(),
            )),
        }
        match probed {
            Ok(report) => {
                outcome.duration_seconds = report.duration_seconds;
                outcome.metadata.extend(report.metadata);
            }
            Err(e) => outcome.warnings.push(ProcessingWarning::new(
                DerivativeStage::Metadata,
                e.to_string(),
            )),
        }
        outcome
    }

    async fn generate_static(
        &self,
        asset_type: AssetType,
        paths: &AssetPaths,
        store: &dyn ByteStore,
    ) -> DerivativeOutcome {
        let mut outcome = DerivativeOutcome::default();
        outcome.thumbnail_url =
            fallback_thumbnail(asset_type, paths, store, &mut outcome.warnings).await;
        outcome
    }
}
