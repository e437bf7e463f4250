use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{CommentsmithError, Result};
use super::detector::LanguageDetector;
use super::llm::{create_backend, CommentBackend, CommentRequest, CommentResponse};
use super::model::{FunctionDescription, Language};
use super::parser::ParserFactory;

/// Functions extracted from one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileExtraction {
    pub file: String,
    pub language: Language,
    pub count: usize,
    pub functions: Vec<FunctionDescription>,
}

/// Per-file result of a directory walk; one bad file never aborts the walk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileReport {
    Extracted(FileExtraction),
    Failed { file: String, error: String },
}

impl FileReport {
    pub fn file(&self) -> &str {
        match self {
            Self::Extracted(extraction) => &extraction.file,
            Self::Failed { file, .. } => file,
        }
    }
}

/// Main orchestration engine: detection, parsing and the comment flow
pub struct Engine {
    config: Config,
    detector: LanguageDetector,
    factory: ParserFactory,
    backend: Option<Box<dyn CommentBackend>>,
}

impl Engine {
    /// Create an engine, connecting the comment backend if it is enabled
    pub fn new(config: Config) -> Self {
        let backend = if config.backend.enabled {
            match create_backend(&config.backend) {
                Ok(backend) => {
                    debug!("Comment backend ready: {}", backend.backend_name());
                    Some(backend)
                }
                Err(e) => {
                    warn!("Failed to initialize comment backend: {}", e);
                    warn!("Continuing without comment generation");
                    None
                }
            }
        } else {
            debug!("Comment backend disabled");
            None
        };

        Self::with_parts(config, backend)
    }

    /// Create an engine that talks to the given backend
    pub fn with_backend(config: Config, backend: Box<dyn CommentBackend>) -> Self {
        Self::with_parts(config, Some(backend))
    }

    /// Create an engine from a config file, or the discovered/default config
    pub fn from_config_path(path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(path)?;
        debug!("Loaded configuration: {:?}", config);
        Ok(Self::new(config))
    }

    fn with_parts(config: Config, backend: Option<Box<dyn CommentBackend>>) -> Self {
        Self {
            config,
            detector: LanguageDetector::new(),
            factory: ParserFactory::new(),
            backend,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Detect by extension, then by content when the config allows it
    pub fn detect_language(&self, filename: &str, text: &str) -> Option<Language> {
        if self.config.parsing.content_detection_fallback {
            self.detector.detect(filename, text)
        } else {
            self.detector.detect_by_extension(filename)
        }
    }

    /// Every language the detector knows, paired with whether it can be parsed
    pub fn languages(&self) -> Vec<(Language, bool)> {
        self.detector
            .supported_languages()
            .into_iter()
            .map(|lang| (lang, self.factory.is_parseable(lang)))
            .collect()
    }

    /// Extract all functions from an uploaded file body.
    ///
    /// Invalid UTF-8 is replaced, not rejected.
    pub fn extract(&self, filename: &str, content: &[u8]) -> Result<FileExtraction> {
        self.check_size(filename, content)?;
        let text = String::from_utf8_lossy(content);

        let language = self
            .detect_language(filename, &text)
            .ok_or_else(|| CommentsmithError::UnsupportedLanguage {
                file: filename.to_string(),
            })?;

        let mut parser = self.factory.get_parser(language)?;
        let functions = parser.parse_content(&text)?;

        debug!("{}: {} functions as {}", filename, functions.len(), language);

        Ok(FileExtraction {
            file: filename.to_string(),
            language,
            count: functions.len(),
            functions,
        })
    }

    /// Read and extract a single file
    pub fn extract_path(&self, path: &Path) -> Result<FileExtraction> {
        let content = std::fs::read(path)?;
        self.extract(&path.to_string_lossy(), &content)
    }

    /// Extract every recognised file under `dir`, honouring `.gitignore`.
    ///
    /// Files whose extension maps to no language are skipped silently; any
    /// other failure is kept as a [`FileReport::Failed`] entry.
    pub fn extract_directory(&self, dir: &Path) -> Result<Vec<FileReport>> {
        info!("Scanning {}", dir.display());

        let walker = WalkBuilder::new(dir)
            .hidden(false)
            .git_ignore(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut reports = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                CommentsmithError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
            })?;
            let path = entry.path();

            if !path.is_file() || self.detector.detect_by_extension(&path.to_string_lossy()).is_none() {
                continue;
            }

            reports.push(self.report_for(path));
        }

        let failed = reports
            .iter()
            .filter(|r| matches!(r, FileReport::Failed { .. }))
            .count();
        info!("Processed {} files ({} failed)", reports.len(), failed);

        Ok(reports)
    }

    /// Extract `path`, walking it if it is a directory
    pub fn extract_any(&self, path: &Path) -> Result<Vec<FileReport>> {
        if path.is_dir() {
            self.extract_directory(path)
        } else {
            Ok(vec![self.report_for(path)])
        }
    }

    fn report_for(&self, path: &Path) -> FileReport {
        match self.extract_path(path) {
            Ok(extraction) => FileReport::Extracted(extraction),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                FileReport::Failed {
                    file: path.to_string_lossy().to_string(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// Turn a prompt file into the request for a single generated comment.
    ///
    /// The file must be a prompt by extension. Its code part is detected by
    /// content and parsed, and must contain exactly one function.
    pub fn prepare_comment(&self, filename: &str, content: &[u8]) -> Result<CommentRequest> {
        self.check_size(filename, content)?;

        let language = self
            .detector
            .detect_by_extension(filename)
            .ok_or_else(|| CommentsmithError::UnsupportedLanguage {
                file: filename.to_string(),
            })?;
        if language != Language::Prompt {
            return Err(CommentsmithError::NotAPrompt {
                file: filename.to_string(),
                language,
            });
        }

        let text = String::from_utf8_lossy(content);
        let mut splitter = self.factory.get_parser(Language::Prompt)?;
        let split = match splitter.parse_content(&text) {
            Ok(mut records) if !records.is_empty() => records.remove(0),
            Ok(_) => return Err(CommentsmithError::CodeNotFound),
            Err(e) => {
                warn!("{}: {}", filename, e);
                return Err(e);
            }
        };

        let task = split.docstring.unwrap_or_default();
        let code = split.full_function_text.unwrap_or_default();

        let code_language = self
            .detector
            .detect_by_content(&code)
            .ok_or_else(|| CommentsmithError::UnsupportedLanguage {
                file: filename.to_string(),
            })?;
        debug!("{}: embedded code detected as {}", filename, code_language);

        let mut parser = self.factory.get_parser(code_language)?;
        let mut functions = parser.parse_content(&code)?;
        if functions.len() != 1 {
            return Err(CommentsmithError::FunctionCount {
                found: functions.len(),
            });
        }
        let description = functions.remove(0);

        Ok(CommentRequest {
            task,
            function: description.full_function_text.clone().unwrap_or_else(|| code.clone()),
            code,
            language: code_language,
            description,
        })
    }

    /// Send a prepared request to the comment backend
    pub async fn comment(&self, request: &CommentRequest) -> Result<CommentResponse> {
        let backend = self
            .backend
            .as_ref()
            .ok_or_else(|| CommentsmithError::Config("Comment backend is disabled".to_string()))?;

        info!(
            "Requesting comment for {} from {}",
            request.description.display_name(),
            backend.backend_name()
        );
        let comment = backend.generate_comment(request).await?;

        Ok(CommentResponse {
            comment,
            function: request.function.clone(),
        })
    }

    fn check_size(&self, filename: &str, content: &[u8]) -> Result<()> {
        let limit = self.config.parsing.max_file_size;
        if content.len() > limit {
            return Err(CommentsmithError::InputTooLarge {
                file: filename.to_string(),
                size: content.len(),
                limit,
            });
        }
        Ok(())
    }
}
