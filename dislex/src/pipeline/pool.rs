// Copyright 2024 Logan Magee
//
// SPDX-License-Identifier: LicenseRef-Proprietary

use std::{
    cmp::Ordering,
    fs::File,
    io::{self, BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write},
    mem,
    path::PathBuf,
    vec,
};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use integer_encoding::{VarIntReader, VarIntWriter};
use log::debug;
use zstd::{Decoder, Encoder};

use crate::{text::SeqPos, tupler::Tuple};

/// A value that can be spilled to and read back from a run file.
pub(crate) trait Record: Sized {
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()>;

    /// Reads the next record, returning `None` at the end of the run.
    fn read_from<R: Read>(reader: &mut R) -> io::Result<Option<Self>>;
}

fn end_of_run<T>(e: io::Error) -> io::Result<Option<T>> {
    match e.kind() {
        ErrorKind::UnexpectedEof => Ok(None),
        _ => Err(e),
    }
}

impl Record for Tuple {
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_varint(self.pos.seq)?;
        writer.write_varint(self.pos.offset)?;
        writer.write_varint(self.chars.len())?;
        writer.write_all(&self.chars)
    }

    fn read_from<R: Read>(reader: &mut R) -> io::Result<Option<Self>> {
        let seq = match reader.read_varint() {
            Ok(seq) => seq,
            Err(e) => return end_of_run(e),
        };
        let offset = reader.read_varint()?;
        let len: usize = reader.read_varint()?;

        let mut chars = vec![0; len];
        reader.read_exact(&mut chars)?;

        Ok(Some(Tuple {
            pos: SeqPos::new(seq, offset),
            chars,
        }))
    }
}

/// A name headed for a fixed slot of the lex text
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Mapped {
    pub(crate) index: u32,
    pub(crate) name: u32,
}

impl Record for Mapped {
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.index)?;
        writer.write_u32::<LittleEndian>(self.name)
    }

    fn read_from<R: Read>(reader: &mut R) -> io::Result<Option<Self>> {
        let index = match reader.read_u32::<LittleEndian>() {
            Ok(index) => index,
            Err(e) => return end_of_run(e),
        };
        let name = reader.read_u32::<LittleEndian>()?;

        Ok(Some(Mapped { index, name }))
    }
}

/// Where and how run files are written
#[derive(Clone, Debug, Default)]
pub(crate) struct SpillPool {
    pub(crate) compression_level: i32,
    pub(crate) temp_dir: Option<PathBuf>,
}

impl SpillPool {
    fn create(&self) -> io::Result<File> {
        match &self.temp_dir {
            Some(dir) => tempfile::tempfile_in(dir),
            None => tempfile::tempfile(),
        }
    }

    /// Writes `records` to a fresh anonymous file and rewinds it.
    fn write_run<T: Record>(&self, records: &[T]) -> io::Result<File> {
        let file = BufWriter::new(self.create()?);

        let mut file = if self.compression_level == 0 {
            let mut writer = file;
            for record in records {
                record.write_to(&mut writer)?;
            }
            writer.into_inner().map_err(|e| e.into_error())?
        } else {
            let mut encoder = Encoder::new(file, self.compression_level)?;
            for record in records {
                record.write_to(&mut encoder)?;
            }
            encoder.finish()?.into_inner().map_err(|e| e.into_error())?
        };
        file.seek(SeekFrom::Start(0))?;

        Ok(file)
    }

    fn open_run(&self, file: File) -> io::Result<Box<dyn Read>> {
        let reader = BufReader::new(file);

        if self.compression_level == 0 {
            Ok(Box::new(reader))
        } else {
            Ok(Box::new(Decoder::with_buffer(reader)?))
        }
    }
}

/// Sorts a stream of records that may not fit in memory.
///
/// Records are buffered until `capacity` of them have arrived, then sorted and spilled as a run.
/// Finishing merges all runs. Streams that never fill the buffer are sorted in memory.
pub(crate) struct ExternalSorter<'p, T, F> {
    pool: &'p SpillPool,
    capacity: usize,
    buffer: Vec<T>,
    runs: Vec<File>,
    compare: F,
}

impl<'p, T, F> ExternalSorter<'p, T, F>
where
    T: Record,
    F: FnMut(&T, &T) -> Ordering,
{
    pub(crate) fn new(pool: &'p SpillPool, capacity: usize, compare: F) -> Self {
        let capacity = capacity.max(1);

        Self {
            pool,
            capacity,
            buffer: Vec::new(),
            runs: Vec::new(),
            compare,
        }
    }

    pub(crate) fn push(&mut self, record: T) -> io::Result<()> {
        self.buffer.push(record);
        if self.buffer.len() >= self.capacity {
            self.spill()?;
        }

        Ok(())
    }

    fn spill(&mut self) -> io::Result<()> {
        self.buffer.sort_unstable_by(&mut self.compare);
        self.runs.push(self.pool.write_run(&self.buffer)?);
        debug!("spilled run {} of {} records", self.runs.len(), self.buffer.len());
        self.buffer.clear();

        Ok(())
    }

    /// Returns the records in sorted order.
    pub(crate) fn finish(mut self) -> io::Result<Sorted<T, F>> {
        if self.runs.is_empty() {
            self.buffer.sort_unstable_by(&mut self.compare);
            return Ok(Sorted::Memory(self.buffer.into_iter()));
        }
        if !self.buffer.is_empty() {
            self.spill()?;
        }

        let mut readers = Vec::with_capacity(self.runs.len());
        let mut heads = Vec::with_capacity(self.runs.len());
        for file in mem::take(&mut self.runs) {
            let mut reader = self.pool.open_run(file)?;
            heads.push(T::read_from(&mut reader)?);
            readers.push(reader);
        }
        debug!("merging {} runs", readers.len());

        Ok(Sorted::Merge {
            readers,
            heads,
            compare: self.compare,
        })
    }
}

/// The output of an [`ExternalSorter`]
pub(crate) enum Sorted<T, F> {
    Memory(vec::IntoIter<T>),
    Merge {
        readers: Vec<Box<dyn Read>>,
        heads: Vec<Option<T>>,
        compare: F,
    },
}

impl<T, F> Iterator for Sorted<T, F>
where
    T: Record,
    F: FnMut(&T, &T) -> Ordering,
{
    type Item = io::Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let (readers, heads, compare) = match self {
            Sorted::Memory(records) => return records.next().map(Ok),
            Sorted::Merge {
                readers,
                heads,
                compare,
            } => (readers, heads, compare),
        };

        let mut min: Option<(usize, &T)> = None;
        let live = heads
            .iter()
            .enumerate()
            .filter_map(|(i, head)| Some((i, head.as_ref()?)));
        for (i, head) in live {
            if min.is_none_or(|(_, m)| compare(head, m) == Ordering::Less) {
                min = Some((i, head));
            }
        }
        let (i, _) = min?;

        let next = match T::read_from(&mut readers[i]) {
            Ok(next) => next,
            Err(e) => return Some(Err(e)),
        };

        mem::replace(&mut heads[i], next).map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sort_numbers(numbers: &[u32], capacity: usize, compression_level: i32) -> Vec<u32> {
        let pool = SpillPool {
            compression_level,
            temp_dir: None,
        };
        let mut sorter = ExternalSorter::new(&pool, capacity, |a: &Mapped, b: &Mapped| {
            a.name.cmp(&b.name)
        });
        for (i, &name) in numbers.iter().enumerate() {
            sorter
                .push(Mapped {
                    index: i as u32,
                    name,
                })
                .unwrap();
        }

        sorter
            .finish()
            .unwrap()
            .map(|record| record.unwrap().name)
            .collect()
    }

    fn numbers(len: usize) -> Vec<u32> {
        (0..len as u32).map(|i| i.wrapping_mul(2654435761) % 1000).collect()
    }

    #[test]
    fn in_memory_when_buffer_never_fills() {
        let numbers = numbers(50);
        let mut expected = numbers.clone();
        expected.sort_unstable();

        assert_eq!(sort_numbers(&numbers, 100, 0), expected);
    }

    #[test]
    fn merges_spilled_runs() {
        let numbers = numbers(1000);
        let mut expected = numbers.clone();
        expected.sort_unstable();

        assert_eq!(sort_numbers(&numbers, 7, 0), expected);
        assert_eq!(sort_numbers(&numbers, 1, 0), expected);
    }

    #[test]
    fn merges_compressed_runs() {
        let numbers = numbers(1000);
        let mut expected = numbers.clone();
        expected.sort_unstable();

        assert_eq!(sort_numbers(&numbers, 64, 3), expected);
    }

    #[test]
    fn tuple_records_survive_a_run() {
        let pool = SpillPool::default();
        let tuples = vec![
            Tuple {
                pos: SeqPos::new(3, 300),
                chars: vec![b'A', 0, b'C'],
            },
            Tuple {
                pos: SeqPos::new(0, u32::MAX - 1),
                chars: vec![],
            },
        ];

        let mut reader = pool.open_run(pool.write_run(&tuples).unwrap()).unwrap();
        assert_eq!(Tuple::read_from(&mut reader).unwrap().as_ref(), Some(&tuples[0]));
        assert_eq!(Tuple::read_from(&mut reader).unwrap().as_ref(), Some(&tuples[1]));
        assert_eq!(Tuple::read_from(&mut reader).unwrap(), None);
    }

    #[test]
    fn tuples_merge_through_compressed_runs() {
        let pool = SpillPool {
            compression_level: 3,
            temp_dir: None,
        };
        let mut sorter =
            ExternalSorter::new(&pool, 2, |a: &Tuple, b: &Tuple| a.chars.cmp(&b.chars));
        for (i, chars) in [&b"GT"[..], b"AC", b"", b"TA", b"AA"].into_iter().enumerate() {
            sorter
                .push(Tuple {
                    pos: SeqPos::new(i as u32, 70_000 * i as u32),
                    chars: chars.to_vec(),
                })
                .unwrap();
        }

        let sorted: Vec<_> = sorter.finish().unwrap().map(Result::unwrap).collect();
        let chars: Vec<_> = sorted.iter().map(|tuple| tuple.chars.as_slice()).collect();
        assert_eq!(chars, [&b""[..], b"AA", b"AC", b"GT", b"TA"]);
        assert_eq!(sorted[2].pos, SeqPos::new(1, 70_000));
    }
}
