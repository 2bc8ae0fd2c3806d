use std::io::{self, Read, Seek, SeekFrom};

/// Sequential little-endian cursor over an in-memory level file.
///
/// Unlike `Cursor`, seeking past the end of the buffer is an `UnexpectedEof` error, so a skip over
/// a truncated section fails where the truncation is rather than at the next read.
pub struct ByteReader<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> ByteReader<'a> {
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	pub fn pos(&self) -> usize {
		self.pos
	}

	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	pub fn remaining(&self) -> usize {
		self.bytes.len() - self.pos
	}

	pub fn set_pos(&mut self, pos: usize) -> io::Result<()> {
		if pos > self.bytes.len() {
			return Err(io::Error::new(
				io::ErrorKind::UnexpectedEof,
				format!("seek to {} past end of {} byte buffer", pos, self.bytes.len()),
			));
		}
		self.pos = pos;
		Ok(())
	}
}

impl Read for ByteReader<'_> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let num = buf.len().min(self.remaining());
		buf[..num].copy_from_slice(&self.bytes[self.pos..self.pos + num]);
		self.pos += num;
		Ok(num)
	}
}

impl Seek for ByteReader<'_> {
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		let target = match pos {
			SeekFrom::Start(offset) => usize::try_from(offset).ok(),
			SeekFrom::Current(delta) => offset_by(self.pos, delta),
			SeekFrom::End(delta) => offset_by(self.bytes.len(), delta),
		};
		let target = target.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "seek before start of buffer"))?;
		self.set_pos(target)?;
		Ok(target as u64)
	}

	fn stream_position(&mut self) -> io::Result<u64> {
		Ok(self.pos as u64)
	}
}

fn offset_by(base: usize, delta: i64) -> Option<usize> {
	let delta = isize::try_from(delta).ok()?;
	base.checked_add_signed(delta)
}

#[cfg(test)]
mod tests {
	use byteorder::{ReadBytesExt, LE};
	use super::*;

	#[test]
	fn reads_advance_position() {
		let mut reader = ByteReader::new(&[0x34, 0x12, 0x78, 0x56, 0x34, 0x12]);
		assert_eq!(reader.read_u16::<LE>().unwrap(), 0x1234);
		assert_eq!(reader.pos(), 2);
		assert_eq!(reader.read_u32::<LE>().unwrap(), 0x12345678);
		assert_eq!(reader.remaining(), 0);
	}

	#[test]
	fn read_past_end_is_eof() {
		let mut reader = ByteReader::new(&[0x01]);
		let err = reader.read_u16::<LE>().unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
	}

	#[test]
	fn seek_is_bounds_checked() {
		let mut reader = ByteReader::new(&[0; 8]);
		assert_eq!(reader.seek(SeekFrom::Current(8)).unwrap(), 8);
		assert_eq!(reader.seek(SeekFrom::Current(1)).unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
		assert_eq!(reader.seek(SeekFrom::Current(-9)).unwrap_err().kind(), io::ErrorKind::InvalidInput);
		assert_eq!(reader.seek(SeekFrom::End(-2)).unwrap(), 6);
	}
}
