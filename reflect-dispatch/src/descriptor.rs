use crate::error::DispatchError;
use crate::host::HostRuntime;

/// Parameter shape of a reflected executable, derived once per dispatch.
///
/// A variadic executable contributes its trailing array parameter as
/// `variadic_element` (the element class, not the array class); everything
/// before it lands in `fixed`. A non-variadic executable has all declared
/// parameters in `fixed`.
pub struct ExecutableDescriptor<C> {
    pub fixed: Vec<C>,
    pub variadic_element: Option<C>,
}

impl<C: Copy> ExecutableDescriptor<C> {
    pub fn derive<H>(host: &H, executable: H::Ref) -> Result<Self, DispatchError>
    where
        H: HostRuntime<Class = C> + ?Sized,
    {
        let mut fixed = host.parameter_types(executable)?;
        let variadic_element = if host.is_variadic(executable)? {
            let tail = fixed.pop().ok_or(DispatchError::WrongArity)?;
            Some(host.component_type(tail)?)
        } else {
            None
        };
        Ok(ExecutableDescriptor { fixed, variadic_element })
    }

    /// Number of slots the packed argument vector will hold.
    pub fn slot_count(&self) -> usize {
        self.fixed.len() + usize::from(self.variadic_element.is_some())
    }

    /// A variadic executable accepts any count >= the fixed prefix; a plain
    /// one demands an exact match.
    pub fn arity_matches(&self, supplied: usize) -> bool {
        if self.variadic_element.is_some() {
            supplied >= self.fixed.len()
        } else {
            supplied == self.fixed.len()
        }
    }
}
