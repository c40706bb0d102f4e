use crate::cli::{CommonArgs, FilterArgs, ScanArgs};
use crate::config::{self, Config};
use crate::extract::{extract_index, ScratchOptions};
use crate::host::{EntryManifest, FileResolver, LocalPathResolver};
use crate::report::{ResultReporter, ScanReport, StdoutReporter};
use crate::scan::{get_new_packs, PackOrder};
use anyhow::Result;
use std::io;
use std::path::Path;

/// Everything one scan invocation needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct ScanInputs {
    pub entry_id: String,
    pub last_message_time_str: String,
    pub order: PackOrder,
    pub scratch: ScratchOptions,
}

/// Extract, filter, and publish. Nothing is reported unless every step succeeds.
pub fn scan_entry(
    resolver: &dyn FileResolver,
    inputs: &ScanInputs,
    reporter: &mut dyn ResultReporter,
) -> Result<ScanReport> {
    let extracted = extract_index(resolver, &inputs.entry_id, &inputs.scratch)?;
    let packs = get_new_packs(
        extracted.index_dir(),
        &inputs.last_message_time_str,
        inputs.order,
    )?;
    tracing::info!(new_packs = packs.len(), "scan complete");
    let report = ScanReport::new(inputs.last_message_time_str.clone(), packs);
    reporter.report(&report)?;
    Ok(report)
}

pub fn run_scan(args: ScanArgs) -> Result<()> {
    let config = config::load_effective(args.common.config.as_deref())?;
    let resolver = resolver_for(args.entries.as_deref().or(config.entries_manifest.as_deref()))?;
    let inputs = ScanInputs {
        entry_id: args.entry_id,
        last_message_time_str: args.since,
        order: args.common.order.unwrap_or(config.order),
        scratch: ScratchOptions {
            root: args.scratch_dir.or_else(|| config.scratch_root.clone()),
            keep: args.keep_scratch || config.keep_scratch,
        },
    };
    let mut reporter = stdout_reporter(&args.common, &config);
    scan_entry(resolver.as_ref(), &inputs, &mut reporter)?;
    Ok(())
}

pub fn run_filter(args: FilterArgs) -> Result<()> {
    let config = config::load_effective(args.common.config.as_deref())?;
    let order = args.common.order.unwrap_or(config.order);
    let packs = get_new_packs(&args.index_dir, &args.since, order)?;
    let report = ScanReport::new(args.since, packs);
    stdout_reporter(&args.common, &config).report(&report)
}

fn resolver_for(manifest: Option<&Path>) -> Result<Box<dyn FileResolver>> {
    Ok(match manifest {
        Some(path) => Box::new(EntryManifest::load(path)?),
        None => Box::new(LocalPathResolver),
    })
}

fn stdout_reporter(common: &CommonArgs, config: &Config) -> StdoutReporter<io::Stdout> {
    StdoutReporter::new(io::stdout(), common.output_format(config.output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use crate::host::FileEntry;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use zip::write::SimpleFileOptions;

    #[derive(Default)]
    struct CollectingReporter {
        reports: Vec<ScanReport>,
    }

    impl ResultReporter for CollectingReporter {
        fn report(&mut self, report: &ScanReport) -> Result<()> {
            self.reports.push(report.clone());
            Ok(())
        }
    }

    struct ErrorResolver;

    impl FileResolver for ErrorResolver {
        fn resolve(&self, _entry_id: &str) -> Result<FileEntry> {
            Ok(FileEntry::Error {
                message: "Item not found".to_string(),
            })
        }
    }

    fn write_index_zip(path: &Path, packs: &[(&str, &str)]) {
        let mut writer = zip::ZipWriter::new(File::create(path).expect("create zip"));
        let options = SimpleFileOptions::default();
        for (id, created) in packs {
            writer
                .start_file(format!("index/{id}/metadata.json"), options)
                .expect("start file");
            let body = format!(r#"{{"name": "{id} pack", "created": "{created}"}}"#);
            writer.write_all(body.as_bytes()).expect("write");
        }
        writer.finish().expect("finish");
    }

    fn inputs(entry_id: &Path, scratch_root: &Path) -> ScanInputs {
        ScanInputs {
            entry_id: entry_id.display().to_string(),
            last_message_time_str: "2022-03-01T00:00:00Z".to_string(),
            order: PackOrder::Id,
            scratch: ScratchOptions {
                root: Some(scratch_root.to_path_buf()),
                keep: false,
            },
        }
    }

    #[test]
    fn reports_only_new_packs() {
        let temp = tempfile::tempdir().expect("tempdir");
        let zip_path = temp.path().join("index.zip");
        write_index_zip(
            &zip_path,
            &[("A", "2022-01-01T00:00:00Z"), ("B", "2022-06-01T00:00:00Z")],
        );

        let mut reporter = CollectingReporter::default();
        let report = scan_entry(
            &LocalPathResolver,
            &inputs(&zip_path, &temp.path().join("scratch")),
            &mut reporter,
        )
        .expect("scan");

        assert_eq!(report.packs.len(), 1);
        assert_eq!(report.packs[0].id, "B");
        assert_eq!(report.packs[0].name.as_deref(), Some("B pack"));
        assert_eq!(reporter.reports, vec![report]);
    }

    #[test]
    fn lookup_failure_reports_nothing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut reporter = CollectingReporter::default();
        let err = scan_entry(
            &ErrorResolver,
            &inputs(&PathBuf::from("12@34"), temp.path()),
            &mut reporter,
        )
        .expect_err("lookup");
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::Lookup { .. })
        ));
        assert!(reporter.reports.is_empty());
    }

    #[test]
    fn timestamp_failure_reports_nothing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let zip_path = temp.path().join("index.zip");
        write_index_zip(&zip_path, &[("A", "June 2022")]);

        let mut reporter = CollectingReporter::default();
        let err = scan_entry(
            &LocalPathResolver,
            &inputs(&zip_path, &temp.path().join("scratch")),
            &mut reporter,
        )
        .expect_err("bad created");
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::Timestamp { .. })
        ));
        assert!(reporter.reports.is_empty());
    }
}
