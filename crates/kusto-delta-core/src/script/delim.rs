use super::{Formatter, ToScript};

/// Comma delimited
pub(super) struct Comma<L>(pub(super) L);

impl<L> ToScript for Comma<L>
where
    L: IntoIterator,
    L::Item: ToScript,
{
    fn to_script(self, f: &mut Formatter<'_>) {
        let mut s = "";
        for i in self.0 {
            fmt!(f, s, i);
            s = ", ";
        }
    }
}
