use super::Formatter;
use crate::schema::{EntityName, HotWindow, KustoTimespan, QuotedText, TableColumn};

macro_rules! fmt {
    ($f:expr, $( $fragments:expr ),* $(,)?) => {{
        $(
            ToScript::to_script($fragments, $f);
        )*
    }};
}

pub(super) trait ToScript {
    fn to_script(self, f: &mut Formatter<'_>);
}

impl ToScript for &str {
    fn to_script(self, f: &mut Formatter<'_>) {
        f.dst.push_str(self);
    }
}

impl ToScript for String {
    fn to_script(self, f: &mut Formatter<'_>) {
        f.dst.push_str(&self);
    }
}

impl ToScript for &EntityName {
    fn to_script(self, f: &mut Formatter<'_>) {
        f.dst.push_str(&self.to_script());
    }
}

impl ToScript for &QuotedText {
    fn to_script(self, f: &mut Formatter<'_>) {
        f.dst.push_str(&self.to_script());
    }
}

impl ToScript for &TableColumn {
    fn to_script(self, f: &mut Formatter<'_>) {
        f.dst.push_str(&self.to_script());
    }
}

impl ToScript for &KustoTimespan {
    fn to_script(self, f: &mut Formatter<'_>) {
        f.dst.push_str(&self.to_string());
    }
}

impl ToScript for &HotWindow {
    fn to_script(self, f: &mut Formatter<'_>) {
        f.dst.push_str(&self.to_script());
    }
}

impl<T: ToScript> ToScript for Option<T> {
    fn to_script(self, f: &mut Formatter<'_>) {
        if let Some(inner) = self {
            inner.to_script(f);
        }
    }
}

impl<T1, T2> ToScript for (T1, T2)
where
    T1: ToScript,
    T2: ToScript,
{
    fn to_script(self, f: &mut Formatter<'_>) {
        fmt!(f, self.0, self.1);
    }
}

impl<T1, T2, T3> ToScript for (T1, T2, T3)
where
    T1: ToScript,
    T2: ToScript,
    T3: ToScript,
{
    fn to_script(self, f: &mut Formatter<'_>) {
        fmt!(f, self.0, self.1, self.2);
    }
}
