use strum_macros::{Display, EnumIter};

/// The eight raw primitive kinds a boxed argument can unbox to.
///
/// `Display` renders the simple name of the corresponding wrapper class,
/// which is what the unboxing diagnostics quote.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum PrimitiveKind {
    #[strum(serialize = "Boolean")]
    Boolean,
    #[strum(serialize = "Byte")]
    Byte,
    #[strum(serialize = "Character")]
    Char,
    #[strum(serialize = "Short")]
    Short,
    #[strum(serialize = "Integer")]
    Int,
    #[strum(serialize = "Long")]
    Long,
    #[strum(serialize = "Float")]
    Float,
    #[strum(serialize = "Double")]
    Double,
}

/// A value kind a dispatch operation can produce or store. Return kinds are
/// `Option<ValueKind>`, with `None` standing for void.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Object,
}

impl ValueKind {
    pub fn primitive(self) -> Option<PrimitiveKind> {
        match self {
            ValueKind::Boolean => Some(PrimitiveKind::Boolean),
            ValueKind::Byte => Some(PrimitiveKind::Byte),
            ValueKind::Char => Some(PrimitiveKind::Char),
            ValueKind::Short => Some(PrimitiveKind::Short),
            ValueKind::Int => Some(PrimitiveKind::Int),
            ValueKind::Long => Some(PrimitiveKind::Long),
            ValueKind::Float => Some(PrimitiveKind::Float),
            ValueKind::Double => Some(PrimitiveKind::Double),
            ValueKind::Object => None,
        }
    }
}

impl From<PrimitiveKind> for ValueKind {
    fn from(kind: PrimitiveKind) -> ValueKind {
        match kind {
            PrimitiveKind::Boolean => ValueKind::Boolean,
            PrimitiveKind::Byte => ValueKind::Byte,
            PrimitiveKind::Char => ValueKind::Char,
            PrimitiveKind::Short => ValueKind::Short,
            PrimitiveKind::Int => ValueKind::Int,
            PrimitiveKind::Long => ValueKind::Long,
            PrimitiveKind::Float => ValueKind::Float,
            PrimitiveKind::Double => ValueKind::Double,
        }
    }
}

/// One raw primitive-or-reference argument slot, index-aligned with the
/// declared parameters of the target executable. For a variadic executable
/// the final slot holds the whole assembled tail array.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum JavaValue<R> {
    Boolean(bool),
    Byte(i8),
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Object(Option<R>),
}

impl<R: Copy> JavaValue<R> {
    pub fn kind(&self) -> ValueKind {
        match self {
            JavaValue::Boolean(_) => ValueKind::Boolean,
            JavaValue::Byte(_) => ValueKind::Byte,
            JavaValue::Char(_) => ValueKind::Char,
            JavaValue::Short(_) => ValueKind::Short,
            JavaValue::Int(_) => ValueKind::Int,
            JavaValue::Long(_) => ValueKind::Long,
            JavaValue::Float(_) => ValueKind::Float,
            JavaValue::Double(_) => ValueKind::Double,
            JavaValue::Object(_) => ValueKind::Object,
        }
    }

    pub fn unwrap_bool_strict(&self) -> bool {
        match self {
            JavaValue::Boolean(value) => *value,
            _ => panic!("expected a boolean slot"),
        }
    }

    pub fn unwrap_byte_strict(&self) -> i8 {
        match self {
            JavaValue::Byte(value) => *value,
            _ => panic!("expected a byte slot"),
        }
    }

    pub fn unwrap_char_strict(&self) -> u16 {
        match self {
            JavaValue::Char(value) => *value,
            _ => panic!("expected a char slot"),
        }
    }

    pub fn unwrap_short_strict(&self) -> i16 {
        match self {
            JavaValue::Short(value) => *value,
            _ => panic!("expected a short slot"),
        }
    }

    pub fn unwrap_int_strict(&self) -> i32 {
        match self {
            JavaValue::Int(value) => *value,
            _ => panic!("expected an int slot"),
        }
    }

    pub fn unwrap_long_strict(&self) -> i64 {
        match self {
            JavaValue::Long(value) => *value,
            _ => panic!("expected a long slot"),
        }
    }

    pub fn unwrap_float_strict(&self) -> f32 {
        match self {
            JavaValue::Float(value) => *value,
            _ => panic!("expected a float slot"),
        }
    }

    pub fn unwrap_double_strict(&self) -> f64 {
        match self {
            JavaValue::Double(value) => *value,
            _ => panic!("expected a double slot"),
        }
    }

    pub fn unwrap_object(&self) -> Option<R> {
        match self {
            JavaValue::Object(value) => *value,
            _ => panic!("expected a reference slot"),
        }
    }
}
