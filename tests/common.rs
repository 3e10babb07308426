/// Shared helpers: NIfTI fixtures and Arrow read-back.
use arrow::array::{Float64Array, UInt32Array};
use arrow::record_batch::RecordBatch;
use byteorder::{ByteOrder, LittleEndian};
use ndarray::ArrayD;
use nifti::writer::WriterOptions;
use nifti::NiftiHeader;
use std::fs::File;
use std::path::{Path, PathBuf};

#[allow(unused)]
/// Write `data` as a NIfTI file with `t_r` as the zoom of its last axis.
/// Parent directories are created.
pub fn write_nifti(path: &Path, data: &ArrayD<f32>, t_r: f32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut header = NiftiHeader::default();
    header.pixdim = [1.0; 8];
    header.pixdim[data.ndim()] = t_r;
    header.scl_slope = 1.0;
    header.scl_inter = 0.0;
    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(data)
        .unwrap_or_else(|e| panic!("writing {}: {e}", path.display()));
}

#[allow(unused)]
/// Write `data` as a little-endian float32 NIfTI-2 file, the container of
/// CIFTI-2 dense series. `data` is `[T, N]`; it is stored with
/// `dim = [6, 1, 1, 1, 1, T, N]` and `t_r` as the zoom of the time axis.
pub fn write_nifti2(path: &Path, data: &ArrayD<f32>, t_r: f64) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let (n_t, n_f) = (data.shape()[0], data.shape()[1]);
    let vox_offset = 544;
    let mut buf = vec![0_u8; vox_offset];
    LittleEndian::write_i32(&mut buf[0..4], 540);
    buf[4..12].copy_from_slice(b"n+2\0\r\n\x1a\n");
    LittleEndian::write_i16(&mut buf[12..14], 16);
    LittleEndian::write_i16(&mut buf[14..16], 32);
    LittleEndian::write_i64_into(&[6, 1, 1, 1, 1, n_t as i64, n_f as i64, 1], &mut buf[16..80]);
    LittleEndian::write_f64_into(&[1.0, 1.0, 1.0, 1.0, 1.0, t_r, 1.0, 1.0], &mut buf[104..168]);
    LittleEndian::write_i64(&mut buf[168..176], vox_offset as i64);
    LittleEndian::write_f64(&mut buf[176..184], 1.0);

    // First axis fastest: the transposed view iterates T within each N.
    let mut voxels = vec![0_u8; n_t * n_f * 4];
    for (i, v) in data.t().iter().enumerate() {
        LittleEndian::write_f32(&mut voxels[i * 4..], *v);
    }
    buf.extend_from_slice(&voxels);
    std::fs::write(path, buf).unwrap_or_else(|e| panic!("writing {}: {e}", path.display()));
}

#[allow(unused)]
/// Write a one-line subject list pointing at `root`.
pub fn write_subject_list(dir: &Path, roots: &[&Path]) -> PathBuf {
    let list = dir.join("subjects.txt");
    let text: Vec<String> = roots.iter().map(|r| r.display().to_string()).collect();
    std::fs::write(&list, text.join("\n")).unwrap();
    list
}

#[allow(unused)]
/// Read the single record batch of an Arrow IPC file.
pub fn read_table(path: &Path) -> RecordBatch {
    let file = File::open(path)
        .unwrap_or_else(|_| panic!("table not found: {}", path.display()));
    let reader = arrow::ipc::reader::FileReader::try_new(file, None).unwrap();
    let mut batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
    assert_eq!(batches.len(), 1, "expected one record batch");
    batches.remove(0)
}

#[allow(unused)]
pub fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch.schema().fields().iter().map(|f| f.name().clone()).collect()
}

#[allow(unused)]
pub fn f64_column(batch: &RecordBatch, name: &str) -> Vec<f64> {
    batch
        .column_by_name(name)
        .unwrap_or_else(|| panic!("missing column {name}"))
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap()
        .values()
        .to_vec()
}

#[allow(unused)]
pub fn u32_column(batch: &RecordBatch, name: &str) -> Vec<u32> {
    batch
        .column_by_name(name)
        .unwrap_or_else(|| panic!("missing column {name}"))
        .as_any()
        .downcast_ref::<UInt32Array>()
        .unwrap()
        .values()
        .to_vec()
}

#[allow(unused)]
/// Maximum absolute difference between two slices.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).fold(0.0_f64, f64::max)
}
