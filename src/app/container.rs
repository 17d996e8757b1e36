use std::sync::Arc;

use crate::adapters::{
    Config, FFmpegAdapter, FFprobeAdapter, JsonTagStore, ProcessToolCheck, RcloneAdapter,
    SixelRenderAdapter, TerminalPromptAdapter, WebDavUploadAdapter,
};
use crate::app::{
    CompositeInteractor, DetectInteractor, DoctorInteractor, DownloadInteractor,
    PreviewInteractor, SyncAudioInteractor, TagInteractor, UploadInteractor,
};
use crate::error::QuadResult;
use crate::ports::{
    AudioPort, EncodePort, ProbePort, PromptPort, RenderPort, SyncPort, TagStorePort,
    ToolCheckPort, UploadPort,
};

pub trait AppContainer: Send + Sync {
    fn tag_interactor(&self) -> Arc<TagInteractor>;
    fn detect_interactor(&self) -> Arc<DetectInteractor>;
    fn preview_interactor(&self) -> Arc<PreviewInteractor>;
    fn composite_interactor(&self) -> Arc<CompositeInteractor>;
    fn sync_audio_interactor(&self) -> Arc<SyncAudioInteractor>;
    fn download_interactor(&self) -> Arc<DownloadInteractor>;
    fn doctor_interactor(&self) -> Arc<DoctorInteractor>;

    /// Needs complete WebDAV settings, so it is built on demand
    fn upload_interactor(&self) -> QuadResult<UploadInteractor>;

    fn config(&self) -> &Config;
}

pub struct DefaultAppContainer {
    config: Config,
    tag_interactor: Arc<TagInteractor>,
    detect_interactor: Arc<DetectInteractor>,
    preview_interactor: Arc<PreviewInteractor>,
    composite_interactor: Arc<CompositeInteractor>,
    sync_audio_interactor: Arc<SyncAudioInteractor>,
    download_interactor: Arc<DownloadInteractor>,
    doctor_interactor: Arc<DoctorInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: Config) -> QuadResult<Self> {
        let tools = &config.tools;
        let probe_port = Arc::new(FFprobeAdapter::new(tools.ffprobe.clone()));
        let encode_port = Arc::new(FFmpegAdapter::new(tools.ffmpeg.clone()));
        let render_port = Arc::new(SixelRenderAdapter::new(
            tools.renderer.clone(),
            tools.renderer_args.clone(),
        ));
        let prompt_port = Arc::new(TerminalPromptAdapter::new());
        let tag_store = Arc::new(JsonTagStore::new(config.tags_file()));
        let sync_port = Arc::new(RcloneAdapter::new(tools.rclone.clone()));
        let tool_check = Arc::new(ProcessToolCheck::new());

        let tag_interactor = Arc::new(TagInteractor::new(
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
            Arc::clone(&encode_port) as Arc<dyn EncodePort>,
            Arc::clone(&render_port) as Arc<dyn RenderPort>,
            prompt_port as Arc<dyn PromptPort>,
            Arc::clone(&tag_store) as Arc<dyn TagStorePort>,
        ));

        let detect_interactor = Arc::new(DetectInteractor::new(
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
            Arc::clone(&encode_port) as Arc<dyn EncodePort>,
        ));

        let preview_interactor = Arc::new(PreviewInteractor::new(
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
            Arc::clone(&encode_port) as Arc<dyn EncodePort>,
            render_port as Arc<dyn RenderPort>,
        ));

        let sync_audio_interactor = Arc::new(SyncAudioInteractor::new(
            Arc::clone(&encode_port) as Arc<dyn AudioPort>,
            Arc::clone(&tag_store) as Arc<dyn TagStorePort>,
            config.sync.settings()?,
        ));

        let composite_interactor = Arc::new(CompositeInteractor::new(
            probe_port as Arc<dyn ProbePort>,
            encode_port as Arc<dyn EncodePort>,
            tag_store as Arc<dyn TagStorePort>,
            config.layout.clone(),
            config.encode.clone(),
        ));

        let download_interactor = Arc::new(DownloadInteractor::new(sync_port as Arc<dyn SyncPort>));
        let doctor_interactor = Arc::new(DoctorInteractor::new(tool_check as Arc<dyn ToolCheckPort>));

        Ok(Self {
            config,
            tag_interactor,
            detect_interactor,
            preview_interactor,
            composite_interactor,
            sync_audio_interactor,
            download_interactor,
            doctor_interactor,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn tag_interactor(&self) -> Arc<TagInteractor> {
        Arc::clone(&self.tag_interactor)
    }

    fn detect_interactor(&self) -> Arc<DetectInteractor> {
        Arc::clone(&self.detect_interactor)
    }

    fn preview_interactor(&self) -> Arc<PreviewInteractor> {
        Arc::clone(&self.preview_interactor)
    }

    fn composite_interactor(&self) -> Arc<CompositeInteractor> {
        Arc::clone(&self.composite_interactor)
    }

    fn sync_audio_interactor(&self) -> Arc<SyncAudioInteractor> {
        Arc::clone(&self.sync_audio_interactor)
    }

    fn download_interactor(&self) -> Arc<DownloadInteractor> {
        Arc::clone(&self.download_interactor)
    }

    fn doctor_interactor(&self) -> Arc<DoctorInteractor> {
        Arc::clone(&self.doctor_interactor)
    }

    fn upload_interactor(&self) -> QuadResult<UploadInteractor> {
        let remote = self.config.webdav.remote()?;
        let upload_port = Arc::new(WebDavUploadAdapter::new(remote)?);
        Ok(UploadInteractor::new(upload_port as Arc<dyn UploadPort>))
    }

    fn config(&self) -> &Config {
        &self.config
    }
}
