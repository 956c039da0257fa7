use coerce_api::{CastError, Resolve, Settable, Slot, Value};

use crate::caster::{Caster, global};

impl Caster {
    /// Convert `src` for the destination and write it.
    ///
    /// `None` is a no-op. Scalar slots convert with the hook-aware converter of
    /// their target and narrow with `as`. Nothing is written when the
    /// conversion fails.
    pub fn set(&self, dst: Option<Slot<'_>>, src: &Value<'_>) -> Result<(), CastError> {
        match dst {
            None => Ok(()),
            Some(slot) => self.write(slot, src),
        }
    }

    /// Write into any [`Settable`] destination.
    pub fn set_into<T: Settable + ?Sized>(
        &self,
        dst: &mut T,
        src: &Value<'_>,
    ) -> Result<(), CastError> {
        let name = dst.type_name();
        self.resolve(name, dst.resolve(), src)
    }

    fn write(&self, slot: Slot<'_>, src: &Value<'_>) -> Result<(), CastError> {
        tracing::trace!(dst = slot.type_name(), src = %src.type_name(), "set");
        match slot {
            Slot::Bool(d) => *d = self.to_bool(src)?,
            Slot::String(d) => *d = self.to_text(src)?,
            Slot::F32(d) => *d = self.to_f64(src)? as f32,
            Slot::F64(d) => *d = self.to_f64(src)?,
            Slot::Isize(d) => *d = self.to_i64(src)? as isize,
            Slot::I8(d) => *d = self.to_i64(src)? as i8,
            Slot::I16(d) => *d = self.to_i64(src)? as i16,
            Slot::I32(d) => *d = self.to_i64(src)? as i32,
            Slot::I64(d) => *d = self.to_i64(src)?,
            Slot::Usize(d) => *d = self.to_u64(src)? as usize,
            Slot::U8(d) => *d = self.to_u64(src)? as u8,
            Slot::U16(d) => *d = self.to_u64(src)? as u16,
            Slot::U32(d) => *d = self.to_u64(src)? as u32,
            Slot::U64(d) => *d = self.to_u64(src)?,
            Slot::Duration(d) => *d = self.to_duration(src)?,
            Slot::Nanos(d) => {
                let v = self.to_duration(src)?;
                *d = v
                    .num_nanoseconds()
                    .ok_or_else(|| CastError::range("duration does not fit in i64 nanoseconds"))?;
            }
            Slot::Timestamp(d) => *d = self.to_time(src)?,
            Slot::Handle(h) => {
                let name = h.type_name();
                return self.resolve(name, h.resolve(), src);
            }
            Slot::Assign(d) => return d.assign(src),
            Slot::Scan(d) => return d.scan(src),
        }
        Ok(())
    }

    /// Follow a resolved handle through at most one indirection.
    ///
    /// A handle that resolves to another handle is not followed.
    fn resolve(&self, name: &str, resolved: Resolve<'_>, src: &Value<'_>) -> Result<(), CastError> {
        match resolved {
            Resolve::Slot(slot) => self.write_resolved(name, slot, src),
            Resolve::Indirect(Some(inner)) => {
                let inner_name = inner.type_name();
                match inner.resolve() {
                    Resolve::Slot(slot) => self.write_resolved(name, slot, src),
                    Resolve::Indirect(_) => Err(CastError::not_settable(name)),
                    Resolve::Unsupported => Err(CastError::unsupported_destination(inner_name)),
                }
            }
            Resolve::Indirect(None) => Err(CastError::not_settable(name)),
            Resolve::Unsupported => Err(CastError::unsupported_destination(name)),
        }
    }

    fn write_resolved(&self, name: &str, slot: Slot<'_>, src: &Value<'_>) -> Result<(), CastError> {
        match slot {
            Slot::Handle(_) => Err(CastError::not_settable(name)),
            slot => self.write(slot, src),
        }
    }
}

/// [`Caster::set`] on the process-wide caster.
pub fn set(dst: Option<Slot<'_>>, src: &Value<'_>) -> Result<(), CastError> {
    global().set(dst, src)
}

/// [`Caster::set_into`] on the process-wide caster.
pub fn set_into<T: Settable + ?Sized>(dst: &mut T, src: &Value<'_>) -> Result<(), CastError> {
    global().set_into(dst, src)
}
