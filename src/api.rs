//! High-level API for one-shot file processing

use crate::calculation::CalculationMethod;
use crate::exceptions::Result;
use crate::logger::Observer;
use crate::pipeline::{OP_CALCULATE, Params, params::PARAM_TYPE};
use crate::processor::FileProcessor;
use std::path::Path;
use std::sync::Arc;

/// Load `input`, run the pipeline saved at `pipeline`, write `output`
pub fn run_pipeline_file(
    input: &Path,
    pipeline: &Path,
    output: &Path,
    observer: Arc<dyn Observer>,
) -> Result<()> {
    let mut processor = FileProcessor::new(observer);
    processor.load(input)?;
    processor.load_pipeline(pipeline)?;
    processor.process_file(output)
}

/// Evaluate the arithmetic in `input` with `method` and write `output`
pub fn calculate_file(
    input: &Path,
    output: &Path,
    method: CalculationMethod,
    observer: Arc<dyn Observer>,
) -> Result<()> {
    let mut processor = FileProcessor::new(observer);
    processor.load(input)?;
    let mut params = Params::new();
    params.insert(PARAM_TYPE.to_string(), method.to_string());
    processor.apply(OP_CALCULATE, params);
    processor.process_file(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::ErrorKind;
    use crate::logger::NullObserver;
    use crate::pipeline::{Operation, PipelineBuilder};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_calculate_file_for_each_method() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("input.txt");
        fs::write(&input, "2 + 2 * 2").unwrap();

        let expected = [
            (CalculationMethod::Regex, "4 * 2"),
            (CalculationMethod::Parser, "6"),
            (CalculationMethod::Library, "6"),
        ];
        for (method, want) in expected {
            let output = temp_dir.path().join(format!("{method}.txt"));
            calculate_file(&input, &output, method, Arc::new(NullObserver)).unwrap();
            assert_eq!(fs::read_to_string(&output).unwrap(), want);
        }
    }

    #[test]
    fn test_run_pipeline_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("input.txt");
        let pipeline = temp_dir.path().join("pipeline.json");
        let output = temp_dir.path().join("output.txt");
        fs::write(&input, "(1 + 2) * 3\n").unwrap();

        let mut builder = PipelineBuilder::new();
        builder.add(Operation::with_params(OP_CALCULATE, [("type", "parser")]));
        builder.add(Operation::with_params("compress", [("type", "zip")]));
        builder.add(Operation::with_params("decompress", [("type", "zip")]));
        builder.save_to_file(&pipeline).unwrap();

        run_pipeline_file(&input, &pipeline, &output, Arc::new(NullObserver)).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "9\n");
    }

    #[test]
    fn test_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let err = calculate_file(
            &temp_dir.path().join("absent.txt"),
            &temp_dir.path().join("out.txt"),
            CalculationMethod::Parser,
            Arc::new(NullObserver),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
