//! NIfTI-2 reading.
//!
//! `nifti` parses NIfTI-1 only, while CIFTI-2 dense series (`*.dtseries.nii`)
//! carry the 540-byte NIfTI-2 header. This reader covers the fields a
//! [`Scan`](crate::scan::Scan) needs and decodes the voxel block into `f64`.
//!
//! # Header layout (bytes)
//! ```text
//! offset  field        type
//!      0  sizeof_hdr   i32       540, also tells the byte order
//!      4  magic        [u8; 8]   "n+2\0\r\n\x1a\n"
//!     12  datatype     i16
//!     16  dim          [i64; 8]
//!    104  pixdim       [f64; 8]
//!    168  vox_offset   i64
//!    176  scl_slope    f64
//!    184  scl_inter    f64
//! ```
//! Voxels are stored first-axis-fastest, as in NIfTI-1.
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use flate2::read::GzDecoder;
use ndarray::{ArrayD, IxDyn, ShapeBuilder};

pub const HEADER_SIZE: usize = 540;
pub const MAGIC: &[u8; 8] = b"n+2\0\r\n\x1a\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Voxel storage types (NIfTI `datatype` codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoxelType {
    U8,
    I16,
    I32,
    F32,
    F64,
    I8,
    U16,
    U32,
    I64,
    U64,
}

impl VoxelType {
    pub fn from_code(code: i16) -> Result<Self> {
        Ok(match code {
            2 => VoxelType::U8,
            4 => VoxelType::I16,
            8 => VoxelType::I32,
            16 => VoxelType::F32,
            64 => VoxelType::F64,
            256 => VoxelType::I8,
            512 => VoxelType::U16,
            768 => VoxelType::U32,
            1024 => VoxelType::I64,
            1280 => VoxelType::U64,
            other => bail!("unsupported NIfTI datatype {other}"),
        })
    }

    pub fn width(self) -> usize {
        match self {
            VoxelType::U8 | VoxelType::I8 => 1,
            VoxelType::I16 | VoxelType::U16 => 2,
            VoxelType::I32 | VoxelType::U32 | VoxelType::F32 => 4,
            VoxelType::I64 | VoxelType::U64 | VoxelType::F64 => 8,
        }
    }

    fn decode<E: ByteOrder>(self, b: &[u8]) -> f64 {
        match self {
            VoxelType::U8 => f64::from(b[0]),
            VoxelType::I8 => f64::from(b[0] as i8),
            VoxelType::I16 => f64::from(E::read_i16(b)),
            VoxelType::U16 => f64::from(E::read_u16(b)),
            VoxelType::I32 => f64::from(E::read_i32(b)),
            VoxelType::U32 => f64::from(E::read_u32(b)),
            VoxelType::I64 => E::read_i64(b) as f64,
            VoxelType::U64 => E::read_u64(b) as f64,
            VoxelType::F32 => f64::from(E::read_f32(b)),
            VoxelType::F64 => E::read_f64(b),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nifti2Header {
    pub endian: Endian,
    pub datatype: VoxelType,
    pub dim: [i64; 8],
    pub pixdim: [f64; 8],
    pub vox_offset: i64,
    pub scl_slope: f64,
    pub scl_inter: f64,
}

impl Nifti2Header {
    /// Parse the first [`HEADER_SIZE`] bytes of `buf`.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            bail!("NIfTI-2 header needs {HEADER_SIZE} bytes, got {}", buf.len());
        }
        match endian_of(&buf[..4]) {
            Some(Endian::Little) => Self::parse::<LittleEndian>(buf, Endian::Little),
            Some(Endian::Big) => Self::parse::<BigEndian>(buf, Endian::Big),
            None => bail!("not a NIfTI-2 header: sizeof_hdr is not {HEADER_SIZE}"),
        }
    }

    fn parse<E: ByteOrder>(buf: &[u8], endian: Endian) -> Result<Self> {
        if &buf[4..12] != MAGIC {
            bail!("bad NIfTI-2 magic {:?}", &buf[4..12]);
        }
        let datatype = VoxelType::from_code(E::read_i16(&buf[12..14]))?;
        let mut dim = [0_i64; 8];
        E::read_i64_into(&buf[16..80], &mut dim);
        let mut pixdim = [0_f64; 8];
        E::read_f64_into(&buf[104..168], &mut pixdim);
        let header = Self {
            endian,
            datatype,
            dim,
            pixdim,
            vox_offset: E::read_i64(&buf[168..176]),
            scl_slope: E::read_f64(&buf[176..184]),
            scl_inter: E::read_f64(&buf[184..192]),
        };

        if !(1..=7).contains(&header.dim[0]) {
            bail!("NIfTI-2 dim[0] = {} is outside 1..=7", header.dim[0]);
        }
        if let Some(bad) = header.dim[1..=header.ndim()].iter().find(|&&d| d < 1) {
            bail!("NIfTI-2 axis length {bad} in dim {:?}", header.dim);
        }
        if header.vox_offset < HEADER_SIZE as i64 {
            bail!("NIfTI-2 vox_offset {} lies inside the header", header.vox_offset);
        }
        Ok(header)
    }

    pub fn ndim(&self) -> usize {
        self.dim[0] as usize
    }

    /// Axis lengths `dim[1..=ndim]`.
    pub fn shape(&self) -> Vec<usize> {
        self.dim[1..=self.ndim()].iter().map(|&d| d as usize).collect()
    }

    /// Decode the voxel block of the whole file `bytes`, scaled by
    /// `scl_slope`/`scl_inter` unless the slope is 0.
    pub fn decode(&self, bytes: &[u8]) -> Result<ArrayD<f64>> {
        let mut values = match self.endian {
            Endian::Little => self.decode_raw::<LittleEndian>(bytes)?,
            Endian::Big => self.decode_raw::<BigEndian>(bytes)?,
        };
        if self.scl_slope != 0.0 && (self.scl_slope != 1.0 || self.scl_inter != 0.0) {
            for v in values.iter_mut() {
                *v = *v * self.scl_slope + self.scl_inter;
            }
        }
        let data = ArrayD::from_shape_vec(IxDyn(&self.shape()).f(), values)
            .context("shaping NIfTI-2 voxel data")?;
        Ok(data)
    }

    fn decode_raw<E: ByteOrder>(&self, bytes: &[u8]) -> Result<Vec<f64>> {
        let width = self.datatype.width();
        let n_bytes = self
            .shape()
            .iter()
            .try_fold(width, |acc, &d| acc.checked_mul(d))
            .context("NIfTI-2 volume size overflows")?;
        let start = self.vox_offset as usize;
        let raw = start
            .checked_add(n_bytes)
            .and_then(|end| bytes.get(start..end))
            .with_context(|| {
                format!(
                    "NIfTI-2 voxel data truncated: need {n_bytes} bytes at offset {start}, \
                     file has {}",
                    bytes.len()
                )
            })?;
        Ok(raw.chunks_exact(width).map(|b| self.datatype.decode::<E>(b)).collect())
    }
}

fn endian_of(first: &[u8]) -> Option<Endian> {
    if LittleEndian::read_i32(first) == HEADER_SIZE as i32 {
        Some(Endian::Little)
    } else if BigEndian::read_i32(first) == HEADER_SIZE as i32 {
        Some(Endian::Big)
    } else {
        None
    }
}

fn open(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    if path.extension().is_some_and(|e| e == "gz") {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Byte order of `path` if it starts with a NIfTI-2 header, `None` otherwise.
pub fn sniff(path: &Path) -> Result<Option<Endian>> {
    let mut first = [0_u8; 4];
    match open(path)?.read_exact(&mut first) {
        Ok(()) => Ok(endian_of(&first)),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

/// Read a `.nii` or `.nii.gz` NIfTI-2 file.
pub fn read_file(path: &Path) -> Result<(Nifti2Header, ArrayD<f64>)> {
    let mut bytes = Vec::new();
    open(path)?
        .read_to_end(&mut bytes)
        .with_context(|| format!("reading {}", path.display()))?;
    let header = Nifti2Header::from_bytes(&bytes)?;
    let data = header.decode(&bytes)?;
    Ok((header, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single-file header with no extensions, followed by `payload`.
    fn file_bytes<E: ByteOrder>(
        datatype: i16,
        dim: [i64; 8],
        slope: f64,
        payload: &[u8],
    ) -> Vec<u8> {
        let mut buf = vec![0_u8; HEADER_SIZE + 4];
        E::write_i32(&mut buf[0..4], HEADER_SIZE as i32);
        buf[4..12].copy_from_slice(MAGIC);
        E::write_i16(&mut buf[12..14], datatype);
        E::write_i64_into(&dim, &mut buf[16..80]);
        E::write_f64_into(&[1.0, 2.0, 2.0, 2.0, 1.0, 0.72, 1.0, 1.0], &mut buf[104..168]);
        E::write_i64(&mut buf[168..176], (HEADER_SIZE + 4) as i64);
        E::write_f64(&mut buf[176..184], slope);
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn little_endian_float_series() {
        let dim = [6, 1, 1, 1, 1, 3, 2, 1];
        let mut payload = vec![0_u8; 6 * 4];
        // First axis fastest: element (t, n) sits at t + 3 * n.
        for (i, v) in [0.0_f32, 1.0, 2.0, 10.0, 11.0, 12.0].iter().enumerate() {
            LittleEndian::write_f32(&mut payload[i * 4..], *v);
        }
        let bytes = file_bytes::<LittleEndian>(16, dim, 0.0, &payload);
        let header = Nifti2Header::from_bytes(&bytes).unwrap();
        assert_eq!(header.endian, Endian::Little);
        assert_eq!(header.shape(), vec![1, 1, 1, 1, 3, 2]);
        assert_eq!(header.pixdim[5], 0.72);

        let data = header.decode(&bytes).unwrap();
        assert_eq!(data[[0, 0, 0, 0, 2, 0]], 2.0);
        assert_eq!(data[[0, 0, 0, 0, 1, 1]], 11.0);
    }

    #[test]
    fn big_endian_ints_are_scaled() {
        let dim = [1, 3, 1, 1, 1, 1, 1, 1];
        let mut payload = vec![0_u8; 3 * 2];
        BigEndian::write_i16_into(&[1, -2, 3], &mut payload);
        let mut bytes = file_bytes::<BigEndian>(4, dim, 2.0, &payload);
        BigEndian::write_f64(&mut bytes[184..192], 0.5);

        let header = Nifti2Header::from_bytes(&bytes).unwrap();
        assert_eq!(header.endian, Endian::Big);
        let data = header.decode(&bytes).unwrap();
        assert_eq!(data.iter().copied().collect::<Vec<_>>(), vec![2.5, -3.5, 6.5]);
    }

    #[test]
    fn truncated_data_is_an_error() {
        let bytes = file_bytes::<LittleEndian>(16, [2, 4, 4, 1, 1, 1, 1, 1], 0.0, &[0; 8]);
        let header = Nifti2Header::from_bytes(&bytes).unwrap();
        let err = header.decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn nifti1_header_is_not_nifti2() {
        let mut bytes = vec![0_u8; HEADER_SIZE];
        LittleEndian::write_i32(&mut bytes[0..4], 348);
        assert_eq!(endian_of(&bytes[..4]), None);
        assert!(Nifti2Header::from_bytes(&bytes).is_err());
    }

    #[test]
    fn unsupported_datatype_is_rejected() {
        let bytes = file_bytes::<LittleEndian>(128, [1, 1, 1, 1, 1, 1, 1, 1], 0.0, &[0; 3]);
        assert!(Nifti2Header::from_bytes(&bytes).is_err());
    }
}
