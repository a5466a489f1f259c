//! Fixed schemas for well-known value types

use crate::config::{
    AdditionalProperties, CustomDefinition, CustomDefinitionProvider, GeneratorOption, Module,
    ProviderMarker, SchemaGeneratorConfigBuilder,
};
use crate::context::GenerationContext;
use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use crate::error::Result;
use crate::keyword::{SchemaKeyword, SchemaType};
use crate::node::SchemaObject;
use std::collections::HashMap;
use std::rc::Rc;

/// Primitive names whose values can never be null
const NON_NULLABLE_PRIMITIVES: [&str; 8] = ["boolean", "byte", "char", "short", "int", "long", "float", "double"];

#[derive(Debug, Clone, PartialEq)]
struct FixedType {
    /// `None` produces the empty schema
    schema_type: Option<SchemaType>,
    format: Option<String>,
}

/// Maps type names to inline schemas holding just a `type` (and optional `format`).
///
/// Names are matched against the full type name first, then against its last
/// dot-separated segment. Generic types never match.
#[derive(Debug, Clone, Default)]
pub struct SimpleTypeModule {
    fixed_types: HashMap<String, FixedType>,
}

impl SimpleTypeModule {
    /// Built-in scalar names
    pub fn for_primitive_types() -> Self {
        let mut module = Self::default().with_empty_schema("Object");
        for name in ["String", "Character", "char", "CharSequence", "Byte", "byte"] {
            module = module.with_string_type(name, None);
        }
        for name in ["Boolean", "boolean"] {
            module = module.with_boolean_type(name);
        }
        for name in ["Integer", "int"] {
            module = module.with_integer_type(name, Some("int32"));
        }
        for name in ["Long", "long"] {
            module = module.with_integer_type(name, Some("int64"));
        }
        for name in ["Short", "short"] {
            module = module.with_integer_type(name, None);
        }
        for name in ["Double", "double"] {
            module = module.with_number_type(name, Some("double"));
        }
        for name in ["Float", "float"] {
            module = module.with_number_type(name, Some("float"));
        }
        module
    }

    /// Built-in scalar names plus date/time, UUID, URI and big-number types
    pub fn for_primitive_and_additional_types() -> Self {
        let mut module = Self::for_primitive_types().with_string_type("LocalDate", Some("date"));
        for name in [
            "LocalDateTime",
            "LocalTime",
            "ZonedDateTime",
            "OffsetDateTime",
            "OffsetTime",
            "Instant",
            "Date",
            "Calendar",
        ] {
            module = module.with_string_type(name, Some("date-time"));
        }
        module = module
            .with_string_type("UUID", Some("uuid"))
            .with_string_type("URI", Some("uri"))
            .with_string_type("ZoneId", None)
            .with_integer_type("BigInteger", None);
        for name in ["BigDecimal", "Number"] {
            module = module.with_number_type(name, None);
        }
        module
    }

    fn with(mut self, name: &str, schema_type: Option<SchemaType>, format: Option<&str>) -> Self {
        self.fixed_types.insert(
            name.to_string(),
            FixedType {
                schema_type,
                format: format.map(str::to_string),
            },
        );
        self
    }

    /// Accept any value
    #[must_use]
    pub fn with_empty_schema(self, name: &str) -> Self {
        self.with(name, None, None)
    }

    #[must_use]
    pub fn with_string_type(self, name: &str, format: Option<&str>) -> Self {
        self.with(name, Some(SchemaType::String), format)
    }

    #[must_use]
    pub fn with_boolean_type(self, name: &str) -> Self {
        self.with(name, Some(SchemaType::Boolean), None)
    }

    #[must_use]
    pub fn with_integer_type(self, name: &str, format: Option<&str>) -> Self {
        self.with(name, Some(SchemaType::Integer), format)
    }

    #[must_use]
    pub fn with_number_type(self, name: &str, format: Option<&str>) -> Self {
        self.with(name, Some(SchemaType::Number), format)
    }
}

fn lookup<'m>(fixed_types: &'m HashMap<String, FixedType>, ty: &TypeDescriptor) -> Option<&'m FixedType> {
    let TypeDescriptor::Named { name, args } = ty else {
        return None;
    };
    if !args.is_empty() {
        return None;
    }
    fixed_types.get(name).or_else(|| {
        let simple = name.rsplit('.').next()?;
        fixed_types.get(simple)
    })
}

fn is_non_nullable_primitive(member: &MemberDescriptor) -> bool {
    matches!(
        member.ty(),
        TypeDescriptor::Named { name, args } if args.is_empty() && NON_NULLABLE_PRIMITIVES.contains(&name.as_str())
    )
}

impl Module for SimpleTypeModule {
    fn apply_to_config(&self, builder: &mut SchemaGeneratorConfigBuilder) {
        let fixed_types = Rc::new(self.fixed_types.clone());

        builder
            .members_mut()
            .nullable
            .add(|member, _| is_non_nullable_primitive(member).then_some(false));

        let empty_schema = |fixed_types: Rc<HashMap<String, FixedType>>| {
            move |ty: &TypeDescriptor| {
                lookup(&fixed_types, ty).is_some_and(|fixed| fixed.schema_type.is_none())
            }
        };
        let is_empty_schema = empty_schema(Rc::clone(&fixed_types));
        builder
            .types_mut()
            .attributes
            .additional_properties
            .add(move |ty, _| is_empty_schema(ty).then_some(AdditionalProperties::Unconstrained));
        let is_empty_schema = empty_schema(Rc::clone(&fixed_types));
        builder
            .types_mut()
            .attributes
            .pattern_properties
            .add(move |ty, _| is_empty_schema(ty).then(Vec::new));

        builder
            .types_mut()
            .add_custom_definition_provider(SimpleTypeDefinitionProvider { fixed_types });
    }
}

struct SimpleTypeDefinitionProvider {
    fixed_types: Rc<HashMap<String, FixedType>>,
}

impl CustomDefinitionProvider for SimpleTypeDefinitionProvider {
    fn provide_custom_schema_definition(
        &self,
        ty: &TypeDescriptor,
        context: &mut GenerationContext<'_>,
        _marker: ProviderMarker,
    ) -> Result<Option<CustomDefinition>> {
        let Some(fixed) = lookup(&self.fixed_types, ty) else {
            return Ok(None);
        };
        let mut schema = SchemaObject::new();
        if let Some(schema_type) = fixed.schema_type {
            schema.insert(context.keyword(SchemaKeyword::Type).to_string(), schema_type.as_str().into());
        }
        if context
            .config()
            .has_option(GeneratorOption::ExtraOpenApiFormatValues)
        {
            if let Some(format) = &fixed.format {
                schema.insert(context.keyword(SchemaKeyword::Format).to_string(), format.as_str().into());
            }
        }
        Ok(Some(CustomDefinition::inline(schema)))
    }
}
