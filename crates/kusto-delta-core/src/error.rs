use std::sync::Arc;

/// The error raised by the parser, the model fold, and script emission.
///
/// Carries a kind, a message, and an optional cause. The delta engine never
/// raises it: two valid models always produce a valid delta.
#[derive(Clone)]
pub struct DeltaError {
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    message: String,
    cause: Option<DeltaError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorKind {
    Parse,
    UnsupportedCommand,
    Model,
    Policy,
    Script,
}

impl DeltaError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn unsupported_command(command_text: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedCommand, command_text)
    }

    pub fn model(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Model, message)
    }

    pub fn policy(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Policy, message)
    }

    pub fn script(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Script, message)
    }

    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ErrorInner {
                kind,
                message: message.into(),
                cause: None,
            }),
        }
    }

    /// Adds context to this error.
    ///
    /// Context is displayed outermost first, ending with the root cause.
    pub fn context(self, consequent: DeltaError) -> DeltaError {
        let mut err = consequent;
        let inner = Arc::get_mut(&mut err.inner).expect("consequent error must be unshared");
        assert!(
            inner.cause.is_none(),
            "consequent error must not already have a cause"
        );
        inner.cause = Some(self);
        err
    }

    pub fn is_unsupported_command(&self) -> bool {
        self.inner.kind == ErrorKind::UnsupportedCommand
    }

    fn chain(&self) -> impl Iterator<Item = &DeltaError> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.cause.as_ref()?;
            Some(err)
        }))
    }
}

impl std::error::Error for DeltaError {}

impl core::fmt::Display for DeltaError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            let prefix = match err.inner.kind {
                ErrorKind::Parse => "parse error",
                ErrorKind::UnsupportedCommand => "unsupported command",
                ErrorKind::Model => "invalid model",
                ErrorKind::Policy => "invalid policy payload",
                ErrorKind::Script => "script emission",
            };
            write!(f, "{}: {}", prefix, err.inner.message)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for DeltaError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("DeltaError")
                .field("kind", &self.inner.kind)
                .field("message", &self.inner.message)
                .field("cause", &self.inner.cause)
                .finish()
        }
    }
}
